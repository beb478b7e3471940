//! 通行证进度引擎
//!
//! 纯内存计算：经验累加、等级推导、完成判定与奖励领取。
//! 引擎不做持久化，由服务层负责加载与保存。

mod clock;
mod progression;

pub use clock::{Clock, FixedClock, SystemClock};
pub use progression::{EXP_PER_LEVEL, ExperienceOutcome, ProgressionEngine, level_for_experience};
