//! Angel One SmartAPI adapter

#![allow(non_snake_case)]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::brokers::{Broker, LoginCredentials, LoginTokens, LtpRequest, RefreshedTokens};
use crate::error::{AppError, Result};

const BASE_URL: &str = "https://apiconnect.angelone.in";

const LOGIN_TIMEOUT: Duration = Duration::from_secs(10);
const LTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Angel One broker implementation
pub struct AngelBroker {
    client: Client,
}

impl AngelBroker {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn get_headers(&self, api_key: &str, auth_token: Option<&str>) -> reqwest::header::HeaderMap {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Content-Type", "application/json".parse().unwrap());
        headers.insert("Accept", "application/json".parse().unwrap());
        headers.insert("X-UserType", "USER".parse().unwrap());
        headers.insert("X-SourceID", "WEB".parse().unwrap());
        headers.insert("X-ClientLocalIP", "127.0.0.1".parse().unwrap());
        headers.insert("X-ClientPublicIP", "127.0.0.1".parse().unwrap());
        headers.insert("X-MACAddress", "00:00:00:00:00:00".parse().unwrap());

        if !api_key.is_empty() {
            if let Ok(value) = api_key.parse() {
                headers.insert("X-PrivateKey", value);
            }
        }

        if let Some(token) = auth_token {
            if let Ok(value) = format!("Bearer {}", token).parse() {
                headers.insert("Authorization", value);
            }
        }

        headers
    }
}

/// SmartAPI wraps every response in the same envelope. `status` is the
/// authoritative success flag; HTTP-level 2xx alone means nothing.
#[derive(Deserialize)]
struct SmartApiEnvelope<T> {
    #[serde(default)]
    status: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    errorcode: Option<String>,
    data: Option<T>,
}

impl<T> SmartApiEnvelope<T> {
    /// Unwrap the data payload, converting a non-true status into an
    /// upstream error that keeps the broker's message and errorcode.
    fn into_data(self) -> Result<T> {
        if !self.status {
            return Err(AppError::Upstream {
                message: if self.message.is_empty() {
                    "Upstream request failed".to_string()
                } else {
                    self.message
                },
                errorcode: self.errorcode.filter(|c| !c.is_empty()),
            });
        }

        self.data.ok_or_else(|| AppError::Upstream {
            message: "No data in upstream response".to_string(),
            errorcode: None,
        })
    }
}

#[async_trait]
impl Broker for AngelBroker {
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginTokens> {
        #[derive(Serialize)]
        struct LoginBody {
            clientcode: String,
            password: String,
            totp: String,
        }

        #[derive(Deserialize)]
        struct LoginData {
            jwtToken: String,
            refreshToken: String,
            feedToken: String,
        }

        let body = LoginBody {
            clientcode: credentials.client_id,
            password: credentials.password,
            totp: credentials.totp,
        };

        let response = self
            .client
            .post(format!(
                "{}/rest/auth/angelbroking/user/v1/loginByPassword",
                BASE_URL
            ))
            .headers(self.get_headers(&credentials.api_key, None))
            .timeout(LOGIN_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let envelope: SmartApiEnvelope<LoginData> = response.json().await?;
        let data = envelope.into_data()?;

        Ok(LoginTokens {
            jwt_token: data.jwtToken,
            feed_token: data.feedToken,
            refresh_token: data.refreshToken,
        })
    }

    async fn ltp(&self, auth_token: &str, request: LtpRequest) -> Result<serde_json::Value> {
        #[derive(Serialize)]
        struct LtpBody {
            exchange: String,
            tradingsymbol: String,
            symboltoken: String,
        }

        let body = LtpBody {
            exchange: request.exchange,
            tradingsymbol: request.trading_symbol,
            symboltoken: request.symbol_token,
        };

        let response = self
            .client
            .post(format!(
                "{}/rest/secure/angelbroking/order/v1/getLtpData",
                BASE_URL
            ))
            .headers(self.get_headers("", Some(auth_token)))
            .timeout(LTP_TIMEOUT)
            .json(&body)
            .send()
            .await?;

        let envelope: SmartApiEnvelope<serde_json::Value> = response.json().await?;
        envelope.into_data()
    }

    async fn refresh_tokens(
        &self,
        api_key: &str,
        auth_token: &str,
        refresh_token: &str,
    ) -> Result<RefreshedTokens> {
        #[derive(Serialize)]
        struct RefreshBody {
            refreshToken: String,
        }

        #[derive(Deserialize)]
        struct RefreshData {
            jwtToken: String,
            feedToken: String,
        }

        let body = RefreshBody {
            refreshToken: refresh_token.to_string(),
        };

        let response = self
            .client
            .post(format!(
                "{}/rest/auth/angelbroking/jwt/v1/generateTokens",
                BASE_URL
            ))
            .headers(self.get_headers(api_key, Some(auth_token)))
            .json(&body)
            .send()
            .await?;

        let envelope: SmartApiEnvelope<RefreshData> = response.json().await?;
        let data = envelope.into_data()?;

        Ok(RefreshedTokens {
            jwt_token: data.jwtToken,
            feed_token: data.feedToken,
        })
    }

    async fn logout(&self, auth_token: Option<&str>, client_id: &str) -> Result<()> {
        #[derive(Serialize)]
        struct LogoutBody {
            clientcode: String,
        }

        let body = LogoutBody {
            clientcode: client_id.to_string(),
        };

        let response = self
            .client
            .post(format!(
                "{}/rest/secure/angelbroking/user/v1/logout",
                BASE_URL
            ))
            .headers(self.get_headers("", auth_token))
            .json(&body)
            .send()
            .await?;

        let envelope: SmartApiEnvelope<serde_json::Value> = response.json().await?;
        envelope.into_data().map(|_| ())
    }
}
