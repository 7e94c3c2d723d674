/// One resolved row of the host's neighbor table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborEntry {
    pub ip_address: String,
    pub mac_address: String,
}

/// `arp -a` rows with an unresolved hardware address carry this literal in
/// the MAC position and must not be reported as devices.
const INCOMPLETE_SENTINEL: &str = "(incomplete)";

/// Parse raw `arp -a` output into (ip, mac) pairs, one per resolvable line.
///
/// Expected row shape: `? (192.168.1.50) at aa:bb:cc:dd:ee:ff on en0 ...`.
/// Header lines, noise, and rows missing either field are skipped silently;
/// duplicates are kept in order for the reconciler to resolve.
pub fn parse_neighbor_table(output: &str) -> Vec<NeighborEntry> {
    output.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<NeighborEntry> {
    let open = line.find('(')?;
    let close = open + line[open..].find(')')?;
    let ip = line[open + 1..close].trim();
    if ip.is_empty() {
        return None;
    }

    // The hardware address is the token after the " at " marker.
    let at = line.find(" at ")?;
    let mac = line[at + 4..].split_whitespace().next()?;
    if mac == INCOMPLETE_SENTINEL {
        return None;
    }

    Some(NeighborEntry {
        ip_address: ip.to_string(),
        mac_address: mac.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_row() {
        let entries = parse_neighbor_table(
            "? (192.168.1.50) at aa:bb:cc:dd:ee:ff on en0 ifscope [ethernet]",
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ip_address, "192.168.1.50");
        assert_eq!(entries[0].mac_address, "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn skips_incomplete_rows() {
        let entries = parse_neighbor_table(
            "? (192.168.1.99) at (incomplete) on en0 ifscope [ethernet]",
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn skips_noise_lines() {
        let output = "\n? (192.168.1.1) at b8:7b:d4:b8:07:25 on en0 ifscope [ethernet]\nsome header text\n";
        let entries = parse_neighbor_table(output);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let output = "? (192.168.1.5) at aa:aa:aa:aa:aa:aa on en0\n? (192.168.1.6) at aa:aa:aa:aa:aa:aa on en0\n";
        let entries = parse_neighbor_table(output);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ip_address, "192.168.1.5");
        assert_eq!(entries[1].ip_address, "192.168.1.6");
    }
}
