use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    pub partner_name: Option<String>,
    pub partner_address: Option<String>,
    pub partner_manager_first_name: Option<String>,
    pub partner_manager_last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartnerRequest {
    pub partner_name: Option<String>,
    pub partner_address: Option<String>,
    pub partner_manager_first_name: Option<String>,
    pub partner_manager_last_name: Option<String>,
}
