// file: src/jobs/schedule.rs
// description: deterministic minute offset that spreads jobs sharing the default schedule
// reference: cron minute field replacement

use std::num::NonZeroU32;

pub const MINUTES_PER_HOUR: NonZeroU32 = match NonZeroU32::new(60) {
    Some(minutes) => minutes,
    None => unreachable!(),
};

/// Sum of the code points of `id`, modulo `modulus`. Not a hash in any
/// cryptographic sense; distinct ids may collide.
pub fn hash_offset(id: &str, modulus: NonZeroU32) -> u32 {
    let sum = id
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(u32::from(c))));
    (sum % u64::from(modulus.get())) as u32
}

/// Returns `schedule` unchanged unless it is the default schedule, in which
/// case the minute field becomes the job's offset within the hour.
pub fn effective_schedule(job_id: &str, schedule: Option<&str>, default_schedule: &str) -> String {
    let schedule = schedule.unwrap_or(default_schedule);
    if schedule.trim() != default_schedule.trim() {
        return schedule.to_string();
    }

    let rest: Vec<&str> = schedule.split_whitespace().skip(1).collect();
    format!("{} {}", hash_offset(job_id, MINUTES_PER_HOUR), rest.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "0 2 * * *";

    fn modulus(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_hash_offset_known_value() {
        // 'a' + 'b' = 97 + 98 = 195
        assert_eq!(hash_offset("ab", MINUTES_PER_HOUR), 15);
        assert_eq!(hash_offset("", MINUTES_PER_HOUR), 0);
    }

    #[test]
    fn test_hash_offset_range_and_stability() {
        for id in ["dou_people", "clipping-ministerio", "José", "x", "a_very_long_job_identifier"] {
            let first = hash_offset(id, MINUTES_PER_HOUR);
            assert!(first < 60);
            assert_eq!(first, hash_offset(id, MINUTES_PER_HOUR));
        }
    }

    #[test]
    fn test_hash_offset_uses_code_points() {
        // 'é' is U+00E9
        assert_eq!(hash_offset("é", modulus(1000)), 233);
    }

    #[test]
    fn test_modulus_one_always_zero() {
        for id in ["", "ab", "dou_people"] {
            assert_eq!(hash_offset(id, modulus(1)), 0);
        }
        assert_eq!(MINUTES_PER_HOUR.get(), 60);
    }

    #[test]
    fn test_default_schedule_gets_offset() {
        let schedule = effective_schedule("ab", None, DEFAULT);
        assert_eq!(schedule, "15 2 * * *");

        let explicit_default = effective_schedule("ab", Some("0 2 * * *"), DEFAULT);
        assert_eq!(explicit_default, "15 2 * * *");
    }

    #[test]
    fn test_custom_schedule_untouched() {
        assert_eq!(
            effective_schedule("ab", Some("30 7 * * 1-5"), DEFAULT),
            "30 7 * * 1-5"
        );
    }
}
