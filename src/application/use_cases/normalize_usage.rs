use serde_json::Value;
use tracing::debug;

use crate::domain::{TokenUsage, VendorFamily};

/// Where one vendor puts its usage counters in a response body.
struct UsageLayout {
    container: &'static str,
    prompt: &'static str,
    completion: &'static str,
    total: &'static str,
}

const COMPLETION_LAYOUTS: &[UsageLayout] = &[UsageLayout {
    container: "usage",
    prompt: "prompt_tokens",
    completion: "completion_tokens",
    total: "total_tokens",
}];

// REST responses use camelCase; SDK-serialized payloads use snake_case.
const GENERATION_LAYOUTS: &[UsageLayout] = &[
    UsageLayout {
        container: "usageMetadata",
        prompt: "promptTokenCount",
        completion: "candidatesTokenCount",
        total: "totalTokenCount",
    },
    UsageLayout {
        container: "usage_metadata",
        prompt: "prompt_token_count",
        completion: "candidates_token_count",
        total: "total_token_count",
    },
];

/// Read token usage from a raw vendor response using the family's field layout.
///
/// All-or-nothing: the three counters are taken from the first layout that
/// yields every one of them as an unsigned integer. Anything else (missing
/// container, missing field, wrong type) gives an all-zero [`TokenUsage`].
/// Never fails.
pub fn normalize_token_usage(raw: &Value, family: VendorFamily) -> TokenUsage {
    let layouts = match family {
        VendorFamily::Completion => COMPLETION_LAYOUTS,
        VendorFamily::Generation => GENERATION_LAYOUTS,
    };

    match layouts.iter().find_map(|layout| read_layout(raw, layout)) {
        Some(usage) => usage,
        None => {
            debug!("No complete {} usage block in response, reporting zero usage", family);
            TokenUsage::default()
        }
    }
}

fn read_layout(raw: &Value, layout: &UsageLayout) -> Option<TokenUsage> {
    let usage = raw.get(layout.container)?;
    Some(TokenUsage::new(
        usage.get(layout.prompt)?.as_u64()?,
        usage.get(layout.completion)?.as_u64()?,
        usage.get(layout.total)?.as_u64()?,
    ))
}
