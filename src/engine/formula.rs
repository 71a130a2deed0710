// ==========================================
// 工厂提货明细拆分系统 - 公式行号平移
// ==========================================
// 职责: 模板第2行公式克隆到第N行时的 A1 引用改写
// 红线: 字符串字面量与 $ 锚定行号保持原样
// ==========================================

/// 1-based 列号 -> 列字母("A"、"AB")
pub fn col_letter(mut col: u32) -> String {
    let mut s = String::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        s.insert(0, (b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    s
}

/// 列字母 -> 1-based 列号
pub fn col_index(letters: &str) -> u32 {
    letters
        .chars()
        .fold(0u32, |acc, c| acc * 26 + (c as u32 - 'A' as u32 + 1))
}

/// 把公式里的相对行号整体平移 row_delta。
/// 跳过双引号字符串;`A$1` 的行号锚定不动;`SUM(` 这类函数名
/// 后面紧跟左括号,不含行号,扫描天然不会误改。
pub fn translate_formula(formula: &str, row_delta: i64) -> String {
    let chars: Vec<char> = formula.chars().collect();
    let mut out = String::with_capacity(formula.len() + 4);
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        // 字符串字面量整段照抄("" 为转义引号)
        if c == '"' {
            out.push(c);
            i += 1;
            while i < chars.len() {
                out.push(chars[i]);
                if chars[i] == '"' {
                    i += 1;
                    break;
                }
                i += 1;
            }
            continue;
        }

        if c.is_ascii_uppercase() {
            // 引用前面不能紧贴标识符字符,否则是名字的一部分
            let prev_is_ident = i > 0 && (chars[i - 1].is_alphanumeric() || chars[i - 1] == '_');
            let mut j = i;
            while j < chars.len() && chars[j].is_ascii_uppercase() {
                j += 1;
            }
            let letters_len = j - i;
            let anchored = j < chars.len() && chars[j] == '$';
            let digit_start = if anchored { j + 1 } else { j };
            let mut k = digit_start;
            while k < chars.len() && chars[k].is_ascii_digit() {
                k += 1;
            }
            let is_ref = !prev_is_ident
                && (1..=3).contains(&letters_len)
                && k > digit_start
                && (k >= chars.len() || (!chars[k].is_alphanumeric() && chars[k] != '_' && chars[k] != '('));

            if is_ref {
                let letters: String = chars[i..j].iter().collect();
                let digits: String = chars[digit_start..k].iter().collect();
                out.push_str(&letters);
                if anchored {
                    // $行号锚定,照抄
                    out.push('$');
                    out.push_str(&digits);
                } else if let Ok(row) = digits.parse::<i64>() {
                    let shifted = (row + row_delta).max(1);
                    out.push_str(&shifted.to_string());
                } else {
                    out.push_str(&digits);
                }
                i = k;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}
