//! 服务层数据传输对象

use serde::{Deserialize, Serialize};

use crate::models::{PassType, UserBattlePass};

/// 排行榜最多返回的条数
pub const LEADERBOARD_SIZE: usize = 100;

/// 报名请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub jid: i64,
    pub battle_pass_id: i64,
    #[serde(default, rename = "type")]
    pub pass_type: PassType,
    #[serde(default)]
    pub is_premium: bool,
    /// 等级上限，缺省为 `DEFAULT_TOTAL_LEVELS`
    #[serde(default)]
    pub total_levels: Option<i32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EnrollRequest {
    pub fn new(jid: i64, battle_pass_id: i64) -> Self {
        Self {
            jid,
            battle_pass_id,
            pass_type: PassType::default(),
            is_premium: false,
            total_levels: None,
            name: None,
            description: None,
        }
    }
}

/// 加经验结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceResult {
    pub user_battle_pass: UserBattlePass,
    pub level_up: bool,
}

/// 领奖结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResult {
    pub user_battle_pass: UserBattlePass,
}

/// 批量操作中单个用户的失败信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemError {
    pub jid: i64,
    pub message: String,
}

/// 批量报名结果
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAssignResult {
    pub success_count: usize,
    pub errors: Vec<BulkItemError>,
}

/// 批量加经验结果
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkExperienceResult {
    pub updated_count: usize,
    pub level_ups: usize,
    pub errors: Vec<BulkItemError>,
}

/// 排行榜条目
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 名次，从 1 开始
    pub rank: usize,
    pub jid: i64,
    pub level: i32,
    pub experience: i64,
    pub completion_percentage: f64,
    pub is_completed: bool,
    pub is_premium: bool,
}

/// 由已排序的记录生成排行榜
///
/// 调用方保证输入按 level DESC, experience DESC, id ASC 排序
pub fn build_leaderboard(records: &[UserBattlePass]) -> Vec<LeaderboardEntry> {
    records
        .iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(i, r)| LeaderboardEntry {
            rank: i + 1,
            jid: r.jid,
            level: r.level,
            experience: r.experience,
            completion_percentage: r.completion_percentage(),
            is_completed: r.is_completed,
            is_premium: r.is_premium,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(jid: i64, level: i32, experience: i64) -> UserBattlePass {
        let mut r = UserBattlePass::enroll(jid, 1, PassType::Standard, false, Utc::now());
        r.id = jid;
        r.level = level;
        r.experience = experience;
        r.total_levels = 10;
        r
    }

    #[test]
    fn test_build_leaderboard_ranks() {
        let records = vec![record(3, 8, 8200), record(1, 5, 5000), record(2, 5, 4900)];
        let board = build_leaderboard(&records);

        assert_eq!(board.len(), 3);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].jid, 3);
        assert_eq!(board[0].completion_percentage, 80.0);
        assert_eq!(board[2].rank, 3);
        assert_eq!(board[2].jid, 2);
    }

    #[test]
    fn test_build_leaderboard_truncates() {
        let records: Vec<_> = (0..150).map(|i| record(i, 1, 1000)).collect();
        let board = build_leaderboard(&records);

        assert_eq!(board.len(), LEADERBOARD_SIZE);
        assert_eq!(board.last().map(|e| e.rank), Some(LEADERBOARD_SIZE));
    }

    #[test]
    fn test_enroll_request_defaults() {
        let req: EnrollRequest =
            serde_json::from_str(r#"{"jid": 1001, "battlePassId": 7}"#).unwrap();
        assert_eq!(req, EnrollRequest::new(1001, 7));

        let req: EnrollRequest = serde_json::from_str(
            r#"{"jid": 1001, "battlePassId": 7, "type": "premium", "isPremium": true}"#,
        )
        .unwrap();
        assert_eq!(req.pass_type, PassType::Premium);
        assert!(req.is_premium);
    }

    #[test]
    fn test_bulk_result_serialization() {
        let result = BulkExperienceResult {
            updated_count: 2,
            level_ups: 1,
            errors: vec![BulkItemError {
                jid: 9,
                message: "并发冲突，请重试".to_string(),
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["updatedCount"], 2);
        assert_eq!(json["levelUps"], 1);
        assert_eq!(json["errors"][0]["jid"], 9);
    }
}
