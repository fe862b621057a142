use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum remote-access entries per vendor list.
pub const MAX_REMOTE_ACCESS: usize = 6;

/// A remote-desktop connection entry (TeamViewer or AnyDesk).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteAccess {
    pub id: String,
    pub password: String,
}

/// A customer/company record. Field names match the API's JSON names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub fantasy_name: String,
    #[serde(default)]
    pub cnpj: String,
    #[serde(default)]
    pub state_registration: String,
    #[serde(default)]
    pub municipal_registration: String,
    #[serde(default)]
    pub cep: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub phone2: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub teamviewer: Vec<RemoteAccess>,
    #[serde(default)]
    pub anydesk: Vec<RemoteAccess>,
    #[serde(default)]
    pub payment_type: String,
    #[serde(default)]
    pub monthly_fee: String,
    #[serde(default)]
    pub contract_type: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    /// A blank record; id 0 means it has not been persisted yet.
    pub fn new() -> Self {
        Self {
            country: "Brasil".to_string(),
            ..Self::default()
        }
    }

    /// Name shown in lists: fantasy name, falling back to the legal name.
    pub fn display_name(&self) -> &str {
        if self.fantasy_name.is_empty() {
            &self.name
        } else {
            &self.fantasy_name
        }
    }
}

/// One page of the client list as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientPage {
    pub items: Vec<Client>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl ClientPage {
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 || self.per_page == 0 {
            1
        } else {
            ((self.total as u32) + self.per_page - 1) / self.per_page
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_legal_name() {
        let mut client = Client::new();
        client.name = "Padaria Central Ltda".to_string();
        assert_eq!(client.display_name(), "Padaria Central Ltda");

        client.fantasy_name = "Padaria Central".to_string();
        assert_eq!(client.display_name(), "Padaria Central");
    }

    #[test]
    fn new_client_defaults_country_to_brasil() {
        let client = Client::new();
        assert_eq!(client.country, "Brasil");
        assert_eq!(client.id, 0);
    }

    #[test]
    fn client_payload_uses_api_field_names() {
        let mut client = Client::new();
        client.name = "Empresa X".to_string();
        client.teamviewer.push(RemoteAccess {
            id: "123 456 789".to_string(),
            password: "abc123".to_string(),
        });

        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["name"], "Empresa X");
        assert_eq!(json["country"], "Brasil");
        assert_eq!(json["teamviewer"][0]["id"], "123 456 789");
        assert_eq!(json["teamviewer"][0]["password"], "abc123");
        // Server-managed timestamps are absent until the server sets them
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn client_parses_with_missing_optional_fields() {
        let client: Client =
            serde_json::from_str(r#"{"id": 7, "name": "Empresa Y"}"#).unwrap();
        assert_eq!(client.id, 7);
        assert_eq!(client.name, "Empresa Y");
        assert!(client.teamviewer.is_empty());
        assert!(client.created_at.is_none());
    }

    #[test]
    fn page_count_rounds_up() {
        let page = ClientPage {
            items: Vec::new(),
            total: 21,
            page: 1,
            per_page: 10,
        };
        assert_eq!(page.total_pages(), 3);

        let empty = ClientPage {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 10,
        };
        assert_eq!(empty.total_pages(), 1);
    }
}
