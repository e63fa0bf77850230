//! Wire format of the oracle HTTP API.
//!
//! `POST {base}/score` with [`ScoreRequest`] answers [`ScoreResponse`];
//! `POST {base}/transform` with [`TransformRequest`] answers
//! [`TransformResponse`].

use fidelity_core::models::{DimensionScore, Rubric};
use serde::{Deserialize, Serialize};

pub const SCORE_PATH: &str = "/score";
pub const TRANSFORM_PATH: &str = "/transform";

#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest<'a> {
    pub document: &'a str,
    pub rubric: &'a Rubric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub dimensions: Vec<DimensionScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformRequest<'a> {
    pub document: &'a str,
    pub instruction: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub document: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_request_carries_the_rubric() {
        let rubric = Rubric::summary_default();
        let json = serde_json::to_value(ScoreRequest {
            document: "doc",
            rubric: &rubric,
        })
        .unwrap();
        assert_eq!(json["document"], "doc");
        assert_eq!(json["rubric"]["dimensions"][0]["name"], "faithfulness");
        assert_eq!(json["rubric"]["scale"]["max"], 5.0);
    }

    #[test]
    fn score_response_tolerates_missing_rationale() {
        let resp: ScoreResponse = serde_json::from_str(
            r#"{"dimensions":[{"dimension_name":"coverage","score":4}]}"#,
        )
        .unwrap();
        assert_eq!(resp.dimensions[0].dimension_name, "coverage");
        assert_eq!(resp.dimensions[0].score, 4.0);
        assert!(resp.dimensions[0].rationale.is_empty());
    }
}
