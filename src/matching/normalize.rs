// ==========================================
// 工厂提货明细拆分系统 - 名称归一化
// ==========================================
// 职责: 供应商/工厂名称的规范化,供模糊匹配与文件命名使用
// 纯函数,无 I/O
// ==========================================

/// 企业后缀剥离表。
/// 只剥离末尾的一个后缀,多个候选同时命中时取最长者
/// （如「实业有限公司」优先于「有限公司」）。
const LEGAL_SUFFIXES: [&str; 19] = [
    "有限责任公司",
    "股份有限公司",
    "有限公司",
    "实业有限公司",
    "实业",
    "科技有限公司",
    "科技",
    "电器有限公司",
    "电器",
    "智能电器有限公司",
    "智能",
    "生物科技有限公司",
    "生物科技",
    "电子有限公司",
    "电子",
    "制造有限公司",
    "制造",
    "贸易有限公司",
    "贸易",
];

/// 行政区划后缀（用于剥离「深圳市」「广东省」这类地域前缀）
const REGION_MARKERS: [&str; 9] = [
    "省", "市", "自治区", "自治州", "地区", "盟", "州", "县", "区",
];

fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

fn is_stripped_punct(c: char) -> bool {
    matches!(
        c,
        '（' | '）'
            | '('
            | ')'
            | '【'
            | '】'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '《'
            | '》'
            | '“'
            | '”'
            | '"'
            | '\''
            | '`'
            | '·'
            | '•'
            | ','
            | '，'
            | '.'
            | '。'
            | ':'
            | '：'
            | ';'
            | '；'
            | '-'
            | '_'
            | '—'
            | '/'
            | '\\'
            | '|'
    )
}

/// 剥离末尾的一个企业后缀,最长命中优先
fn strip_legal_suffix(s: &str) -> &str {
    let mut best: Option<&str> = None;
    for t in LEGAL_SUFFIXES {
        if s.ends_with(t) {
            match best {
                Some(b) if b.len() >= t.len() => {}
                _ => best = Some(t),
            }
        }
    }
    match best {
        Some(t) => &s[..s.len() - t.len()],
        None => s,
    }
}

/// 剥离开头的一个地域前缀：2~7 个汉字 + 省/市/区等标记。
/// 贪婪匹配（先尝试较长的汉字段）,与配置表里常见的
/// 「广东省」「中山市」「内蒙古自治区」写法对齐。
fn strip_region_prefix(s: &str) -> &str {
    let chars: Vec<char> = s.chars().collect();
    // 统计开头连续汉字数
    let mut cjk_run = 0;
    for c in &chars {
        if is_cjk(*c) {
            cjk_run += 1;
        } else {
            break;
        }
    }
    let max_n = cjk_run.min(7);
    let mut n = max_n;
    while n >= 2 {
        let rest: String = chars[n..].iter().collect();
        for m in REGION_MARKERS {
            if rest.starts_with(m) {
                let cut: usize = chars[..n].iter().map(|c| c.len_utf8()).sum::<usize>() + m.len();
                return &s[cut..];
            }
        }
        n -= 1;
    }
    s
}

/// 归一化匹配键：去空白（含全角空格）、去标点、去末尾企业后缀。
/// 空输入返回空串。
pub fn norm_key(s: &str) -> String {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && !is_stripped_punct(*c))
        .collect();
    strip_legal_suffix(&cleaned).to_string()
}

/// 供应商短名：去企业后缀、去地域前缀,取最后一段汉字（最多保留末尾6字）。
/// 空输入返回「未知供应商」;无汉字时取前10个字符。
pub fn supplier_short_name(s: &str) -> String {
    let x = s.trim();
    if x.is_empty() {
        return "未知供应商".to_string();
    }
    let x = strip_legal_suffix(x).trim();
    let x = strip_region_prefix(x).trim();

    // 收集汉字段,取最后一段
    let mut runs: Vec<String> = Vec::new();
    let mut cur = String::new();
    for c in x.chars() {
        if is_cjk(c) {
            cur.push(c);
        } else if !cur.is_empty() {
            runs.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }

    if let Some(t) = runs.last() {
        let chars: Vec<char> = t.chars().collect();
        let tail: String = if chars.len() > 6 {
            chars[chars.len() - 6..].iter().collect()
        } else {
            t.clone()
        };
        return sanitize_filename(&tail);
    }
    sanitize_filename(&x.chars().take(10).collect::<String>())
}

/// 文件名安全化：非法字符段替换为 "_" ,空白段收敛为单个空格
pub fn sanitize_filename(s: &str) -> String {
    let mut replaced = String::new();
    let mut last_was_repl = false;
    for c in s.trim().chars() {
        if matches!(
            c,
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\r' | '\n'
        ) {
            if !last_was_repl {
                replaced.push('_');
                last_was_repl = true;
            }
        } else {
            replaced.push(c);
            last_was_repl = false;
        }
    }

    let mut out = String::new();
    let mut pending_space = false;
    for c in replaced.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norm_key_strips_whitespace_punct_suffix() {
        assert_eq!(norm_key(" 深圳市 正美（电子）科技 "), "深圳市正美电子");
        assert_eq!(norm_key("深圳市正美电子有限公司"), "深圳市正美");
        assert_eq!(norm_key("正美电子有限公司"), "正美");
        assert_eq!(norm_key(""), "");
    }

    #[test]
    fn test_norm_key_fullwidth_space() {
        assert_eq!(norm_key("正美\u{3000}贸易有限公司"), "正美");
    }

    #[test]
    fn test_strip_legal_suffix_longest_wins() {
        assert_eq!(strip_legal_suffix("某某实业有限公司"), "某某");
        assert_eq!(strip_legal_suffix("某某有限公司"), "某某");
        assert_eq!(strip_legal_suffix("某某"), "某某");
    }

    #[test]
    fn test_supplier_short_name() {
        assert_eq!(supplier_short_name("深圳市正美电子有限公司"), "正美");
        assert_eq!(supplier_short_name("广东正美电子有限公司"), "广东正美");
        assert_eq!(supplier_short_name(""), "未知供应商");
        assert_eq!(supplier_short_name("ACME Ltd"), "ACME Ltd");
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize_filename("  空  滤  "), "空 滤");
        assert_eq!(sanitize_filename("a//b"), "a_b");
    }
}
