use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::api::ApiError;
use crate::validation;

/// Company data returned by the registry lookup (BrasilAPI shape).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyInfo {
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub cep: Option<String>,
    pub logradouro: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub municipio: Option<String>,
    pub uf: Option<String>,
}

/// Address data returned by the postal-code lookup (ViaCEP shape).
/// ViaCEP answers unknown CEPs with 200 and `"erro": true`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInfo {
    pub logradouro: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub localidade: Option<String>,
    pub uf: Option<String>,
    #[serde(default)]
    pub erro: bool,
}

/// Client for the public reference-data services. Unauthenticated; both
/// lookups are read-only auto-fill sources for the client form.
pub struct LookupClient {
    client: reqwest::Client,
    cnpj_url: String,
    cep_url: String,
}

impl LookupClient {
    pub fn new(cnpj_url: &str, cep_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            cnpj_url: cnpj_url.trim_end_matches('/').to_string(),
            cep_url: cep_url.trim_end_matches('/').to_string(),
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn lookup_cnpj(&self, cnpj: &str) -> Result<CompanyInfo, ApiError> {
        let digits = validation::clean_cnpj(cnpj);
        if digits.is_empty() {
            return Err(ApiError::Invalid("Informe o CNPJ".to_string()));
        }
        if digits.len() != 14 {
            return Err(ApiError::Invalid("CNPJ deve conter 14 dígitos".to_string()));
        }

        let url = format!("{}/{}", self.cnpj_url, digits);
        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::Invalid("CNPJ não encontrado".to_string()));
        }
        let response = super::check(response).await?;
        Ok(response.json().await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn lookup_cep(&self, cep: &str) -> Result<AddressInfo, ApiError> {
        let digits = validation::clean_cep(cep);
        if digits.is_empty() {
            return Err(ApiError::Invalid("Informe o CEP".to_string()));
        }
        if digits.len() != 8 {
            return Err(ApiError::Invalid("CEP deve conter 8 dígitos".to_string()));
        }

        let url = format!("{}/{}/json", self.cep_url, digits);
        let response = self.client.get(&url).send().await?;
        let response = super::check(response).await?;
        let info: AddressInfo = response.json().await?;
        if info.erro {
            return Err(ApiError::Invalid("CEP não encontrado".to_string()));
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_info_parses_brasilapi_payload() {
        let json = r#"{
            "cnpj": "11222333000181",
            "razao_social": "EMPRESA EXEMPLO LTDA",
            "nome_fantasia": "Exemplo",
            "cep": "01310100",
            "logradouro": "AVENIDA PAULISTA",
            "numero": "1000",
            "complemento": null,
            "bairro": "BELA VISTA",
            "municipio": "SAO PAULO",
            "uf": "SP"
        }"#;
        let info: CompanyInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.razao_social.as_deref(), Some("EMPRESA EXEMPLO LTDA"));
        assert_eq!(info.municipio.as_deref(), Some("SAO PAULO"));
        assert!(info.complemento.is_none());
    }

    #[test]
    fn address_info_parses_viacep_payload() {
        let json = r#"{
            "cep": "01310-100",
            "logradouro": "Avenida Paulista",
            "complemento": "de 612 a 1510 - lado par",
            "bairro": "Bela Vista",
            "localidade": "São Paulo",
            "uf": "SP"
        }"#;
        let info: AddressInfo = serde_json::from_str(json).unwrap();
        assert!(!info.erro);
        assert_eq!(info.localidade.as_deref(), Some("São Paulo"));
    }

    #[test]
    fn viacep_error_flag_is_detected() {
        let info: AddressInfo = serde_json::from_str(r#"{"erro": true}"#).unwrap();
        assert!(info.erro);
    }
}
