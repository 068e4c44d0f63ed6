/// Entry from the clients table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub client_name: String,
    pub client_code: String,
    pub header_image_url: Option<String>,
}
