pub const MAX_WORK: u32 = 500;
pub const MAX_FLAG: u32 = 4000;
pub const MAX_SYS_FLAG: u32 = 1000;

pub const LOCAL_WORK_SLOTS: usize = 32;
pub const TEMP_WORK_SLOTS: usize = 4;
