//! Fallback resolver: synthetic `Etc/GMT±N` identifiers for points with no
//! polygon coverage.

use once_cell::sync::Lazy;

/// The 25-entry polar list, in pole-lookup order: `Etc/GMT`, then
/// `+1..=+12`, then `-1..=-12`. Interned once rather than rebuilt per call.
static POLAR_LIST: Lazy<Vec<String>> = Lazy::new(|| {
    let mut v = Vec::with_capacity(25);
    v.push("Etc/GMT".to_string());
    for n in 1..=12 {
        v.push(format!("Etc/GMT+{n}"));
    }
    for n in 1..=12 {
        v.push(format!("Etc/GMT-{n}"));
    }
    v
});

fn gmt_name(n: i64) -> String {
    match n.cmp(&0) {
        std::cmp::Ordering::Equal => "Etc/GMT".to_string(),
        std::cmp::Ordering::Greater => format!("Etc/GMT-{n}"),
        std::cmp::Ordering::Less => format!("Etc/GMT+{}", -n),
    }
}

/// Resolve the fallback identifiers for `(lat, lon)`, assumed already
/// validated to lie within `[-90, 90] x [-180, 180]`.
pub fn resolve(lat: f64, lon: f64) -> Vec<String> {
    if lat == 90.0 {
        return POLAR_LIST.clone();
    }
    if lon == -180.0 || lon == 180.0 {
        return vec![gmt_name(-12), gmt_name(12)];
    }

    let n_min = (lon / 15.0 - 0.5).ceil() as i64;
    let n_max = (lon / 15.0 + 0.5).floor() as i64;
    (n_min..=n_max).map(gmt_name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pole_returns_25_entries_in_order() {
        let got = resolve(90.0, 0.0);
        assert_eq!(got.len(), 25);
        assert_eq!(got[0], "Etc/GMT");
        assert_eq!(got[1], "Etc/GMT+1");
        assert_eq!(got[12], "Etc/GMT+12");
        assert_eq!(got[13], "Etc/GMT-1");
        assert_eq!(got[24], "Etc/GMT-12");
    }

    #[test]
    fn antimeridian_both_signs() {
        assert_eq!(resolve(0.0, 180.0), vec!["Etc/GMT+12", "Etc/GMT-12"]);
        assert_eq!(resolve(0.0, -180.0), vec!["Etc/GMT+12", "Etc/GMT-12"]);
    }

    #[test]
    fn open_pacific_single_band() {
        // ceil(-140/15 - 0.5) == -9, floor(-140/15 + 0.5) == -9
        assert_eq!(resolve(0.0, -140.0), vec!["Etc/GMT+9"]);
    }

    #[test]
    fn prime_meridian_is_etc_gmt() {
        assert_eq!(resolve(10.0, 0.0), vec!["Etc/GMT"]);
    }

    #[test]
    fn band_boundary_can_return_two_entries() {
        // lon = 7.5 sits exactly on a 15 degree half-boundary.
        let got = resolve(0.0, 7.5);
        assert!(got.len() == 1 || got.len() == 2);
        assert!(got.contains(&"Etc/GMT".to_string()) || got.contains(&"Etc/GMT-1".to_string()));
    }
}
