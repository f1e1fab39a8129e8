use chrono::NaiveTime;

pub fn default_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).expect("valid static default day start")
}
