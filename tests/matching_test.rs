// ==========================================
// 名称匹配集成测试
// ==========================================
// 测试目标: 供应商短名派生与工厂地址匹配的组合行为
// ==========================================

use pickup_splitter::domain::FactoryDirectory;
use pickup_splitter::matching::{match_factory_address, match_factory_name, supplier_short_name};

fn directory() -> FactoryDirectory {
    FactoryDirectory::new(vec![
        ("东莞正美工厂".to_string(), "东莞市长安镇正美工业园8号".to_string()),
        ("和顺智能制造".to_string(), "佛山市顺德区和顺产业园2栋".to_string()),
        ("泰".to_string(), "这个名太短不该被匹配".to_string()),
    ])
}

#[test]
fn test_short_name_then_address() {
    let dir = directory();
    for supplier in [
        "深圳市正美电子有限公司",
        "东莞市正美智能电器有限公司",
        "正美实业",
    ] {
        let short = supplier_short_name(supplier);
        let keys = [short.as_str(), supplier];
        assert_eq!(
            match_factory_address(&keys, &dir),
            "东莞市长安镇正美工业园8号",
            "supplier={}",
            supplier
        );
    }
}

#[test]
fn test_unmatched_supplier_gets_empty_address() {
    let dir = directory();
    let short = supplier_short_name("杭州不存在贸易有限公司");
    assert_eq!(match_factory_address(&[short.as_str()], &dir), "");
}

#[test]
fn test_single_char_key_never_matches() {
    let dir = directory();
    // 归一化后不足2字的键跳过,避免「泰」这类单字误命中
    assert_eq!(match_factory_address(&["泰"], &dir), "");
}

#[test]
fn test_factory_name_resolution_for_folder() {
    let dir = directory();
    assert_eq!(match_factory_name(&["和顺"], &dir), "和顺智能制造");
    assert_eq!(match_factory_name(&["不存在"], &dir), "");
}

#[test]
fn test_empty_supplier_fallback() {
    assert_eq!(supplier_short_name("  "), "未知供应商");
}
