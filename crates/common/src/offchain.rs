use anyhow::{Error, anyhow};
use serde_json::Value;
use tracing::debug;

/// usd price of a coingecko coin id
pub fn get_price_usd(api: &str, coin_id: &str) -> Result<Option<f64>, Error> {
    let url = format!("{api}/simple/price?ids={coin_id}&vs_currencies=usd");
    debug!(%url, "fetching price");
    let res = get_json(&url, None)?;
    Ok(parse_price_usd(&res, coin_id))
}

/// active device count from a sub-network rewards oracle
pub fn get_active_devices(url: &str) -> Result<Option<u64>, Error> {
    debug!(%url, "fetching active devices");
    let res = get_json(url, None)?;
    Ok(res.get("count").and_then(number_as_u64))
}

/// `column` of the first row of a dune query's latest results
pub fn get_dune_latest_row_value(
    api: &str,
    query_id: u64,
    api_key: &str,
    column: &str,
) -> Result<Option<u64>, Error> {
    let url = format!("{api}/query/{query_id}/results?limit=1");
    debug!(%url, "fetching dune query results");
    let res = get_json(&url, Some(("X-Dune-API-Key", api_key)))?;
    let rows = res
        .get("result")
        .and_then(|v| v.get("rows"))
        .and_then(|v| v.as_array())
        .ok_or(anyhow!("error: no result rows found for dune query {query_id}"))?;
    Ok(rows.first().and_then(|row| row.get(column)).and_then(number_as_u64))
}

fn get_json(url: &str, header: Option<(&str, &str)>) -> Result<Value, Error> {
    let mut req = ureq::get(url);
    if let Some((key, value)) = header {
        req = req.header(key, value);
    }
    let body = req.call()?.body_mut().read_to_string()?;
    Ok(serde_json::from_str(&body)?)
}

pub fn parse_price_usd(res: &Value, coin_id: &str) -> Option<f64> {
    res.get(coin_id)
        .and_then(|v| v.get("usd"))
        .and_then(|v| v.as_f64())
}

/// accepts integers, floats (truncated) and numeric strings
pub fn number_as_u64(v: &Value) -> Option<u64> {
    v.as_u64()
        .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .or_else(|| {
            v.as_str().and_then(|s| {
                s.parse::<u64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
            })
        })
}
