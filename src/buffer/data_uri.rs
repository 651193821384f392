//! `data:[<mediatype>];base64,<payload>` URIs, as embedded by glTF exporters.

/// Decode the payload of a base64 `data:` URI. Returns `None` if `uri` is not one, or if the
/// payload is not valid base64.
pub(crate) fn decode(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    base64(payload)
}

fn sextet(c: u8) -> Option<u32> {
    match c {
        b'A'..=b'Z' => Some((c - b'A') as u32),
        b'a'..=b'z' => Some((c - b'a') as u32 + 26),
        b'0'..=b'9' => Some((c - b'0') as u32 + 52),
        b'+' | b'-' => Some(62),
        b'/' | b'_' => Some(63),
        _ => None,
    }
}

fn base64(input: &str) -> Option<Vec<u8>> {
    let input = input.trim_end_matches('=');
    let mut res = Vec::with_capacity(input.len() * 3 / 4);
    let mut acc: u32 = 0;
    let mut bits = 0;
    for c in input.bytes().filter(|b| !b.is_ascii_whitespace()) {
        acc = (acc << 6) | sextet(c)?;
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            res.push((acc >> bits) as u8);
            acc &= (1 << bits) - 1;
        }
    }
    // a single leftover sextet can't encode a byte
    if bits >= 6 {
        return None;
    }
    Some(res)
}
