use crate::client::{ApiClient, ApiRequest};
use crate::error::ApiError;
use crate::types::ListQuery;
use crate::types::auth::AdminProfile;
use crate::types::partners::{CreatePartner, DeletedPartner, Partner, PartnerList, UpdatePartner};

const PROFILE: &str = "/admin/profile";
const PARTNERS: &str = "/admin/partners";
pub const PARTNERS_PAGE_SIZE: u32 = 10;

/// Profile of the credential's owner, admin or partner.
pub async fn profile(client: &ApiClient) -> Result<AdminProfile, ApiError> {
    client.send_json(&ApiRequest::get(PROFILE)).await
}

pub async fn list_partners(client: &ApiClient, query: &ListQuery) -> Result<PartnerList, ApiError> {
    let request = query.apply(ApiRequest::get(PARTNERS), PARTNERS_PAGE_SIZE);
    client.send_json(&request).await
}

pub async fn get_partner(client: &ApiClient, partner_id: i64) -> Result<Partner, ApiError> {
    client
        .send_json(&ApiRequest::get(format!("{PARTNERS}/{partner_id}")))
        .await
}

pub async fn create_partner(client: &ApiClient, form: &CreatePartner) -> Result<Partner, ApiError> {
    let form = form.normalized();
    form.validate()?;
    client.send_json(&ApiRequest::post(PARTNERS).json(&form)?).await
}

pub async fn update_partner(
    client: &ApiClient,
    partner_id: i64,
    update: &UpdatePartner,
) -> Result<Partner, ApiError> {
    let request = ApiRequest::put(format!("{PARTNERS}/{partner_id}")).json(update)?;
    client.send_json(&request).await
}

/// Flip the partner's active flag.
pub async fn toggle_partner(client: &ApiClient, partner_id: i64) -> Result<Partner, ApiError> {
    client
        .send_json(&ApiRequest::patch(format!("{PARTNERS}/{partner_id}/toggle")))
        .await
}

pub async fn delete_partner(client: &ApiClient, partner_id: i64) -> Result<DeletedPartner, ApiError> {
    client
        .send_json(&ApiRequest::delete(format!("{PARTNERS}/{partner_id}")))
        .await
}

/// A partner editing their own profile.
pub async fn update_own_profile(client: &ApiClient, update: &UpdatePartner) -> Result<Partner, ApiError> {
    let request = ApiRequest::put(format!("{PARTNERS}/me/profile")).json(update)?;
    client.send_json(&request).await
}
