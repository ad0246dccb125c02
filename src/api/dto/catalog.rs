//! DTOs for the catalog endpoint.

use serde::Serialize;

use crate::domain::catalog::{Dimension, Metric, SortDirection};

/// Everything a client may put in an aggregation request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub dimensions: Vec<DimensionInfo>,
    pub metrics: Vec<Metric>,
    pub sort_keys: Vec<Metric>,
    pub sort_directions: Vec<SortDirection>,
    pub max_page_size: u32,
}

#[derive(Debug, Serialize)]
pub struct DimensionInfo {
    pub name: Dimension,
    pub filterable: bool,
}

impl CatalogResponse {
    pub fn new(max_page_size: u32) -> Self {
        Self {
            dimensions: Dimension::ALL
                .into_iter()
                .map(|name| DimensionInfo {
                    name,
                    filterable: name.is_filterable(),
                })
                .collect(),
            metrics: Metric::ALL.to_vec(),
            sort_keys: Metric::ALL.to_vec(),
            sort_directions: vec![SortDirection::Asc, SortDirection::Desc],
            max_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_lists_every_dimension() {
        let json = serde_json::to_value(CatalogResponse::new(500)).unwrap();

        assert_eq!(json["dimensions"].as_array().unwrap().len(), 7);
        assert_eq!(
            json["dimensions"][0],
            json!({ "name": "day", "filterable": false })
        );
        assert_eq!(json["metrics"], json!(["spent", "impressions", "clicks"]));
        assert_eq!(json["sortDirections"], json!(["asc", "desc"]));
        assert_eq!(json["maxPageSize"], 500);
    }
}
