use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateUnitRequest {
    pub unit_acronym: Option<String>,
    pub unit_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUnitRequest {
    pub unit_acronym: Option<String>,
    pub unit_name: Option<String>,
}
