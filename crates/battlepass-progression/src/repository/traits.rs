//! 仓储 Trait 定义
//!
//! 服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{BattlePass, UserBattlePass, UserBattlePassStatistics};

/// 用户通行证仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserBattlePassRepositoryTrait: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserBattlePass>>;
    async fn find_by_user_and_pass(
        &self,
        jid: i64,
        battle_pass_id: i64,
    ) -> Result<Option<UserBattlePass>>;
    /// 仅返回 is_active = true 的报名记录
    async fn find_active_by_user_and_pass(
        &self,
        jid: i64,
        battle_pass_id: i64,
    ) -> Result<Option<UserBattlePass>>;
    async fn exists_for_user_and_pass(&self, jid: i64, battle_pass_id: i64) -> Result<bool>;

    /// 插入报名记录，(jid, battle_pass_id) 冲突时返回 `DuplicateEnrollment`
    async fn create(&self, record: &UserBattlePass) -> Result<UserBattlePass>;

    /// 保存进度字段，版本号不匹配时返回 `ConcurrencyConflict`
    async fn save_progress(&self, record: &UserBattlePass) -> Result<UserBattlePass>;

    async fn list_by_user(&self, jid: i64, active_only: bool) -> Result<Vec<UserBattlePass>>;
    /// 按等级、经验倒序，id 升序
    async fn list_by_battle_pass(
        &self,
        battle_pass_id: i64,
        active_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<UserBattlePass>>;
    async fn list_active_for_users(
        &self,
        jids: &[i64],
        battle_pass_id: i64,
    ) -> Result<Vec<UserBattlePass>>;
    async fn user_statistics(&self, jid: i64) -> Result<UserBattlePassStatistics>;
}

/// 通行证仓储接口（只读）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BattlePassRepositoryTrait: Send + Sync {
    async fn get_battle_pass(&self, id: i64) -> Result<Option<BattlePass>>;
}
