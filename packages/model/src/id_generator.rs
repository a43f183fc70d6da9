use chrono::Utc;
use uuid::Uuid;

/// Sequential block id generator for one editing session.
///
/// Ids have the form `block-{seed}-{count}`. The seed combines a coarse
/// timestamp with a random fragment, so two generators never share a
/// prefix; the counter keeps ids distinct even when many blocks are
/// created within the same millisecond.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let random = Uuid::new_v4().simple().to_string();
        Self::from_seed(format!("{}{}", to_base36(millis), &random[..6]))
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.new_id_with_prefix("block")
    }

    /// Next id under a different prefix (e.g. `page`). The counter is shared.
    pub fn new_id_with_prefix(&mut self, prefix: &str) -> String {
        self.count += 1;
        format!("{}-{}-{}", prefix, self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
