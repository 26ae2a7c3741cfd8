use crate::aggregate::Aggregate;
use crate::config::Platform;
use crate::core::Profile;

const NOT_AVAILABLE: &str = "N/A";

/// `1234567` -> `"1,234,567"`
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn count_or_na(count: Option<usize>) -> String {
    count.map(thousands).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `Some(1/3)` -> `"33.33%"`
pub fn percentage(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn name_list(names: &[String]) -> String {
    names.iter().map(|name| format!("\t{}\n", name)).collect()
}

/// Render the profile block, the statistics and both name lists.
pub fn render(profile: &Profile, summary: &Aggregate, platform: Platform) -> String {
    let os = platform.label();

    let mut out = format!(
        "\nProfile:\n\n\
         Name: {name}\n\
         ID: {id}\n\
         Country: {country}\n\n\
         Number of friends: {friends}\n\
         Number of groups: {groups}\n\n\
         Number of games owned: {total}\n\
         Number of {os} games owned: {compatible} ({pct})\n\
         Number of missing games: {missing}\n\n",
        name = profile.name,
        id = profile.id,
        country = profile.country_code.as_deref().unwrap_or(NOT_AVAILABLE),
        friends = count_or_na(profile.friend_count),
        groups = count_or_na(profile.group_count),
        total = thousands(summary.total),
        os = os,
        compatible = thousands(summary.compatible),
        pct = percentage(summary.compatible_ratio()),
        missing = thousands(summary.unresolved),
    );

    out.push_str(&format!("{} games/apps I own:\n", os));
    out.push_str(&name_list(&summary.compatible_names));
    out.push_str(&format!("Non-{} games/apps I own:\n", os));
    out.push_str(&name_list(&summary.incompatible_names));

    out
}
