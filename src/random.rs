use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Uniform value in `low..high`, rounded to 2 decimals.
pub fn rand_amount<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    round2(rng.gen_range(low..high))
}

pub fn rand_id<R: Rng + ?Sized>(rng: &mut R, count: usize) -> i64 {
    rng.gen_range(1..=count as i64)
}

pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

pub fn pick<R: Rng + ?Sized>(rng: &mut R, choices: &[&'static str]) -> Result<&'static str> {
    choices.choose(rng).copied().context("nothing to choose from")
}

pub fn pick_weighted<R: Rng + ?Sized>(
    rng: &mut R,
    choices: &[(&'static str, u32)],
) -> Result<&'static str> {
    let (value, _) = choices.choose_weighted(rng, |(_, weight)| *weight)?;
    Ok(*value)
}

/// Day within the `days` days before `reference`.
pub fn date_before<R: Rng + ?Sized>(rng: &mut R, reference: NaiveDate, days: i64) -> NaiveDate {
    reference - Duration::days(rng.gen_range(0..=days))
}

/// Whole-second instant within the `days` days before midnight of `reference`.
pub fn datetime_before<R: Rng + ?Sized>(
    rng: &mut R,
    reference: NaiveDate,
    days: i64,
) -> Result<NaiveDateTime> {
    let end = reference
        .and_hms_opt(0, 0, 0)
        .context("reference date has no midnight")?;
    Ok(end - Duration::seconds(rng.gen_range(0..=days * 86_400)))
}

pub fn uuid_v4<R: Rng + ?Sized>(rng: &mut R) -> String {
    uuid::Builder::from_random_bytes(rng.gen())
        .into_uuid()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(-0.125_1), -0.13);
    }

    #[test]
    fn test_weighted_pick_skips_zero_weight() {
        let mut rng = seeded_rng(7);
        for _ in 0..200 {
            let value = pick_weighted(&mut rng, &[("never", 0), ("always", 3)]).unwrap();
            assert_eq!(value, "always");
        }
    }

    #[test]
    fn test_dates_stay_before_reference() {
        let mut rng = seeded_rng(1);
        let reference = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        for _ in 0..500 {
            let day = date_before(&mut rng, reference, 30);
            assert!(day <= reference);
            assert!(day >= reference - Duration::days(30));
            let instant = datetime_before(&mut rng, reference, 30).unwrap();
            assert!(instant <= reference.and_hms_opt(0, 0, 0).unwrap());
        }
    }

    #[test]
    fn test_uuid_is_v4() {
        let mut rng = seeded_rng(3);
        let id = uuid_v4(&mut rng);
        let parsed = uuid::Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_ne!(id, uuid_v4(&mut rng));
    }
}
