// ==========================================
// 工厂提货明细拆分系统 - 配置领域模型
// ==========================================
// 用途: 配置加载层写入,拆分引擎只读
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ==========================================
// SkuConfigEntry - SKU 配置条目
// ==========================================
// 来源: 配置文件「SKU信息」sheet 一行
// 别名: 「SKU检索」与 SKU 不同时,会派生一条共享属性的别名条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuConfigEntry {
    pub sku: String,                          // SKU（唯一键,非空）
    pub product_name: String,                 // 产品名称
    pub length_cm: Option<f64>,               // 长（cm）
    pub width_cm: Option<f64>,                // 宽（cm）
    pub height_cm: Option<f64>,               // 高（cm）
    pub gross_weight_per_carton: Option<f64>, // 单箱毛重（kg）
    pub units_per_carton: Option<f64>,        // 单箱数量（箱规）
}

impl SkuConfigEntry {
    /// 仅知道 SKU/产品名,尺寸未知的兜底条目（文件1里出现但配置缺失的SKU）
    pub fn unknown(sku: String, product_name: String) -> Self {
        Self {
            sku,
            product_name,
            length_cm: None,
            width_cm: None,
            height_cm: None,
            gross_weight_per_carton: None,
            units_per_carton: None,
        }
    }
}

// ==========================================
// SkuCatalog - SKU 配置目录
// ==========================================
// 每次运行加载一次,之后只读共享给所有供应商分组
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkuCatalog {
    entries: Vec<SkuConfigEntry>,
    factory_short_by_sku: HashMap<String, String>,
}

impl SkuCatalog {
    /// 从条目列表构建目录,同 SKU 去重保留最后一条（与条目顺序一致）
    pub fn from_entries(
        raw: Vec<SkuConfigEntry>,
        factory_short_by_sku: HashMap<String, String>,
    ) -> Self {
        let mut last_index: HashMap<String, usize> = HashMap::new();
        for (i, e) in raw.iter().enumerate() {
            last_index.insert(e.sku.clone(), i);
        }
        let entries = raw
            .into_iter()
            .enumerate()
            .filter(|(i, e)| last_index.get(&e.sku) == Some(i))
            .map(|(_, e)| e)
            .collect();
        Self {
            entries,
            factory_short_by_sku,
        }
    }

    pub fn entries(&self) -> &[SkuConfigEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, sku: &str) -> bool {
        self.entries.iter().any(|e| e.sku == sku)
    }

    /// SKU -> 工厂简称（别名 SKU 共享主 SKU 的映射）
    pub fn factory_short_name(&self, sku: &str) -> &str {
        self.factory_short_by_sku
            .get(sku)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// SKU -> 单箱数量（配置兜底,文件1无箱规列时使用）
    pub fn units_per_carton(&self, sku: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.sku == sku)
            .and_then(|e| e.units_per_carton)
    }

    /// 补充文件1里出现但目录缺失的 SKU（尺寸未知）
    pub fn push_missing(&mut self, entry: SkuConfigEntry) {
        if !self.contains(&entry.sku) {
            self.entries.push(entry);
        }
    }

    /// 仅保留给定 SKU 集合的条目（减少「匹配」sheet 冗余）;
    /// 集合为空时返回全部条目
    pub fn subset(&self, skus: &HashSet<String>) -> Vec<&SkuConfigEntry> {
        if skus.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries.iter().filter(|e| skus.contains(&e.sku)).collect()
    }
}

// ==========================================
// FactoryDirectory - 工厂名称 -> 工厂地址
// ==========================================
// 保持插入顺序：模糊匹配同分时取先出现的工厂
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactoryDirectory {
    entries: Vec<(String, String)>,
}

impl FactoryDirectory {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
