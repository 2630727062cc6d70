//! Client-side message ids.
//!
//! Ids only key rendered rows; they are never compared for deduplication.

use chrono::Utc;
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate `"{epoch_millis}-{suffix}"` with a 9 character base-36 suffix.
pub fn generate_message_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), random_suffix())
}

fn random_suffix() -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        suffix.push(BASE36[(bits % 36) as usize] as char);
        bits /= 36;
    }
    suffix
}
