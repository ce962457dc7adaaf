//! Output divisions: the unit of serialization.

use serde::{Deserialize, Serialize};

use super::Fighter;

/// One weight division in the published result. Divisions appear in the
/// order the ranking source lists them; fighters are sorted ascending by
/// rank before the division is sealed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    pub weight_class: String,
    pub fighters: Vec<Fighter>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_serializes_with_weight_class_key() {
        let division = Division {
            weight_class: "Heavyweight".into(),
            fighters: Vec::new(),
        };
        let value = serde_json::to_value(&division).unwrap();
        assert_eq!(value["weightClass"], "Heavyweight");
        assert!(value["fighters"].as_array().unwrap().is_empty());
    }
}
