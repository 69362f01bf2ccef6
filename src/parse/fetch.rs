use anyhow::{bail, Context, Result};

/// The public inventory of actions maintained by the organisers.
pub const DEFAULT_SOURCE: &str = "https://ro5hnccyvszzcdzv.public.blob.vercel-storage.com/Website-Content%20-%20Focus%20Group%20Inventory.csv";

/// Fetches the raw CSV text of the action inventory from the given URL.
pub fn get_raw_csv(source: &str) -> Result<String> {
    let mut res = ureq::get(source)
        .config()
        .http_status_as_error(false)
        .build()
        .call()
        .with_context(|| format!("failed to reach {source}"))?;
    if res.status() != 200 {
        bail!(
            "failed to fetch actions from {source}, received status {}",
            res.status()
        );
    }

    res.body_mut()
        .read_to_string()
        .with_context(|| format!("failed to read actions from {source} as text"))
}
