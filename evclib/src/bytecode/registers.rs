use crate::limits::{LOCAL_WORK_SLOTS, TEMP_WORK_SLOTS};

pub const LOCALWORK_BASE: u32 = 0;
pub const SCWK_TEMP_BASE: u32 = LOCALWORK_BASE + LOCAL_WORK_SLOTS as u32;
pub const SCWK_ANSWER: u32 = SCWK_TEMP_BASE + TEMP_WORK_SLOTS as u32;

pub fn work_name(index: u32) -> Option<String> {
    let local_end = SCWK_TEMP_BASE;
    let temp_end = SCWK_ANSWER;
    match index {
        i if (LOCALWORK_BASE..local_end).contains(&i) => {
            Some(format!("LOCALWORK{}", i - LOCALWORK_BASE))
        }
        i if (SCWK_TEMP_BASE..temp_end).contains(&i) => Some(format!("SCWK_TEMP{}", i - SCWK_TEMP_BASE)),
        SCWK_ANSWER => Some("SCWK_ANSWER".to_string()),
        _ => None,
    }
}

pub fn work_index(name: &str) -> Option<u32> {
    if name == "SCWK_ANSWER" {
        return Some(SCWK_ANSWER);
    }
    if let Some(n) = name.strip_prefix("LOCALWORK") {
        let n: u32 = n.parse().ok()?;
        return (n < LOCAL_WORK_SLOTS as u32).then_some(LOCALWORK_BASE + n);
    }
    let n: u32 = name.strip_prefix("SCWK_TEMP")?.parse().ok()?;
    (n < TEMP_WORK_SLOTS as u32).then_some(SCWK_TEMP_BASE + n)
}
