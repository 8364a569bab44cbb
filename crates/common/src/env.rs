use anyhow::Error;

/// reads `key` from the process env, loading a `.env` file first if one exists
pub fn get_env_var(key: &str) -> Result<String, Error> {
    dotenvy::dotenv().ok();
    Ok(std::env::var(key)?)
}
