// ==========================================
// 工厂提货明细拆分系统 - 工厂模糊匹配
// ==========================================
// 职责: 用归一化包含匹配在工厂信息表里找地址/标准工厂名
// 例: 配置里工厂名称含「正美」,文件1供应商含「正美」也能匹配
// ==========================================

use crate::domain::FactoryDirectory;
use crate::matching::normalize::norm_key;

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// 双向包含打分：短串被长串包含时,得分 = 被包含串的字符数
fn containment_score(nk: &str, nn: &str) -> usize {
    if nn.contains(nk) {
        char_len(nk)
    } else if nk.contains(nn) {
        char_len(nn)
    } else {
        0
    }
}

/// 模糊匹配工厂地址。
///
/// keys 按调用方优先级给出（如 [工厂简称, 供应商短名, 供应商全名]）,
/// 归一化后不足2字的 key 跳过；全体 (key, 工厂) 组合里取最高分,
/// 同分保留先出现者；无命中返回空串。
pub fn match_factory_address(keys: &[&str], factories: &FactoryDirectory) -> String {
    if factories.is_empty() {
        return String::new();
    }

    let items: Vec<(String, &str)> = factories
        .entries()
        .iter()
        .map(|(name, addr)| (norm_key(name), addr.as_str()))
        .collect();

    let mut best_score = 0usize;
    let mut best_addr = "";
    for key in keys {
        let nk = norm_key(key);
        if char_len(&nk) < 2 {
            continue;
        }
        for (nn, addr) in &items {
            let score = containment_score(&nk, nn);
            if score > best_score {
                best_score = score;
                best_addr = addr;
            }
        }
    }

    best_addr.to_string()
}

/// 模糊匹配配置表里的「工厂名称」（用作标准工厂文件夹名）。
///
/// 与地址匹配同规则,但归一化后完全相等时加权 1000+长度,
/// 保证精确命中永远压过包含命中。
pub fn match_factory_name(keys: &[&str], factories: &FactoryDirectory) -> String {
    if factories.is_empty() {
        return String::new();
    }

    let items: Vec<(&str, String)> = factories
        .entries()
        .iter()
        .map(|(name, _)| (name.as_str(), norm_key(name)))
        .collect();

    let mut best_score = 0usize;
    let mut best_name = "";
    for key in keys {
        let nk = norm_key(key);
        if char_len(&nk) < 2 {
            continue;
        }
        for (orig, nn) in &items {
            let score = if nk == *nn {
                1000 + char_len(&nk)
            } else {
                containment_score(&nk, nn)
            };
            if score > best_score {
                best_score = score;
                best_name = orig;
            }
        }
    }

    best_name.to_string()
}
