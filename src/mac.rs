use crate::devices::Vendor;

/// Canonicalize a MAC address: zero-pad each octet to two hex digits,
/// uppercase, colon-separated. Empty input yields an empty string rather
/// than an error; the neighbor table sometimes hands us short octets like
/// `a:bb:c:dd:ee:ff`.
pub fn normalize_mac(mac: &str) -> String {
    if mac.is_empty() {
        return String::new();
    }
    mac.split(':')
        .map(|part| format!("{:0>2}", part.to_uppercase()))
        .collect::<Vec<_>>()
        .join(":")
}

/// Classify the brand from a MAC prefix. The table covers the vendors that
/// actually appear on this network; everything else is Other.
pub fn classify_vendor(mac: &str) -> Vendor {
    if mac.is_empty() {
        return Vendor::Other;
    }
    let m = mac.to_uppercase();
    if m.starts_with("36:34:52")
        || m.starts_with("5C:E9:1E")
        || m.starts_with("D4:8A:FC")
        || m.starts_with("F0:B3:EC")
    {
        Vendor::Apple
    } else if m.starts_with("00:00:") || m.starts_with("7A:D3:0C") {
        Vendor::Google
    } else if m.starts_with("D0:FC:D0") {
        Vendor::Att
    } else {
        Vendor::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_pads_and_uppercases() {
        assert_eq!(normalize_mac("a:bb:c:dd:ee:ff"), "0A:BB:0C:DD:EE:FF");
        assert_eq!(normalize_mac("b8:7b:d4:b8:07:25"), "B8:7B:D4:B8:07:25");
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_mac("a:bb:c:dd:ee:ff");
        assert_eq!(normalize_mac(&once), once);
    }

    #[test]
    fn normalize_empty_input() {
        assert_eq!(normalize_mac(""), "");
    }

    #[test]
    fn classify_known_prefixes() {
        assert_eq!(classify_vendor("5c:e9:1e:12:34:56"), Vendor::Apple);
        assert_eq!(classify_vendor("7A:D3:0C:00:00:01"), Vendor::Google);
        assert_eq!(classify_vendor("D0:FC:D0:AB:CD:EF"), Vendor::Att);
    }

    #[test]
    fn classify_unknown_prefix() {
        assert_eq!(classify_vendor("DE:AD:BE:EF:00:01"), Vendor::Other);
        assert_eq!(classify_vendor(""), Vendor::Other);
    }
}
