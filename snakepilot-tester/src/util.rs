use anyhow::{Result, bail};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds, rejecting anything that is not a `u64`.
pub fn parse_seeds(raw: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(raw) {
        let Ok(seed) = token.parse::<u64>() else {
            bail!("Unrecognized seed token: {token}");
        };
        seeds.push(seed);
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}
