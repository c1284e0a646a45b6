use anyhow::{Context, Result};

use super::config_model::{AuthSecret, Database, DotEnvyConfig, Server, Stripe};

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{} is not set", key))
}

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: required("SERVER_PORT")?.parse()?,
        body_limit: required("SERVER_BODY_LIMIT")?.parse()?,
        timeout: required("SERVER_TIMEOUT")?.parse()?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let stripe = Stripe {
        secret_key: required("STRIPE_SECRET_KEY")?,
        webhook_secret: required("STRIPE_WEBHOOK_SECRET")?,
        success_url: required("STRIPE_SUCCESS_URL")?,
        cancel_url: required("STRIPE_CANCEL_URL")?,
        price_basic: required("STRIPE_PRICE_BASIC")?,
        price_premium: required("STRIPE_PRICE_PREMIUM")?,
    };

    let mail_gateway_url = std::env::var("MAIL_GATEWAY_URL").ok();

    Ok(DotEnvyConfig {
        server,
        database,
        stripe,
        mail_gateway_url,
    })
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        jwt_secret: required("JWT_USER_SECRET")?,
    })
}
