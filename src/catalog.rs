//! 广告内容目录
//!
//! 静态的推广内容列表，构造时校验，运行期间只读。
//! 侧边栏条目为单 CTA，底部条目为多 CTA + 特性列表，
//! 两者统一为 `AdEntry`，CTA 数量不同而已。

use serde::{Deserialize, Serialize};

use crate::errors::{DocadsError, Result};

/// 行动号召按钮
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToAction {
    /// 按钮文案
    pub label: String,
    /// 跳转目标
    pub url: String,
    /// 是否为主按钮（影响样式）
    #[serde(default)]
    pub primary: bool,
}

impl CallToAction {
    pub fn new<L: Into<String>, U: Into<String>>(label: L, url: U, primary: bool) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            primary,
        }
    }
}

/// 单条推广内容
///
/// 构造后不可变。通过 [`AdEntry::new`] 构造时校验必填字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdEntry {
    /// 唯一标识
    pub id: String,
    /// 标题
    pub title: String,
    /// 描述文案
    pub description: String,
    /// 行动号召按钮，至少一个
    pub ctas: Vec<CallToAction>,
    /// 特性列表（底部广告使用）
    #[serde(default)]
    pub features: Vec<String>,
}

impl AdEntry {
    /// 创建并校验一条推广内容
    pub fn new<I, T, D>(id: I, title: T, description: D, ctas: Vec<CallToAction>) -> Result<Self>
    where
        I: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        let entry = Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            ctas,
            features: Vec::new(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// 附加特性列表
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = features;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(DocadsError::validation("Ad entry id must not be empty"));
        }
        if self.title.is_empty() {
            return Err(DocadsError::validation(format!(
                "Ad entry '{}' has an empty title",
                self.id
            )));
        }
        if self.ctas.is_empty() {
            return Err(DocadsError::validation(format!(
                "Ad entry '{}' must have at least one call to action",
                self.id
            )));
        }
        Ok(())
    }
}

/// 有序、不可变的内容目录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<AdEntry>,
}

impl Catalog {
    /// 构造目录，空目录视为配置错误
    pub fn new(entries: Vec<AdEntry>) -> Result<Self> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// 按索引读取，调用方保证 `index < len()`
    pub fn get(&self, index: usize) -> &AdEntry {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdEntry> {
        self.entries.iter()
    }

    /// 反序列化绕过了 `new`，读入后需要补一次校验
    fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(DocadsError::validation("Catalog must not be empty"));
        }
        for entry in &self.entries {
            entry.validate()?;
        }
        Ok(())
    }
}

/// 两个投放位各自的目录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSet {
    pub sidebar: Catalog,
    pub footer: Catalog,
}

impl CatalogSet {
    pub fn new(sidebar: Catalog, footer: Catalog) -> Self {
        Self { sidebar, footer }
    }

    /// 从 TOML 文本加载目录（配置文件覆盖内容时使用）
    pub fn from_toml(content: &str) -> Result<Self> {
        let set: CatalogSet = toml::from_str(content)?;
        set.sidebar.validate()?;
        set.footer.validate()?;
        Ok(set)
    }
}

/// 资源链接常量
mod urls {
    pub const MECHANICAL: &str = "https://www.ansys.com/products/structures/ansys-mechanical";
    pub const DOWNLOAD: &str = "https://www.ansys.com/academic/students";
    pub const TRAINING: &str = "https://www.ansys.com/training";
    pub const COMMUNITY: &str = "https://forum.ansys.com/";
    pub const DOCUMENTATION: &str = "https://ansyshelp.ansys.com/";
    pub const PYMECHANICAL: &str = "https://github.com/ansys/pymechanical";
}

impl Default for CatalogSet {
    /// 内置的内容数据库
    fn default() -> Self {
        let sidebar = Catalog::new(vec![
            AdEntry::new(
                "mechanical-pro",
                "Ansys Mechanical",
                "Industry-leading finite element analysis for structural simulation.",
                vec![CallToAction::new("Learn More", urls::MECHANICAL, true)],
            )
            .unwrap(),
            AdEntry::new(
                "student-version",
                "Free Student Version",
                "Get Ansys Mechanical Student for learning and non-commercial use.",
                vec![CallToAction::new("Download Free", urls::DOWNLOAD, true)],
            )
            .unwrap(),
            AdEntry::new(
                "training",
                "Ansys Training",
                "Master Mechanical with expert-led courses and tutorials.",
                vec![CallToAction::new("Start Learning", urls::TRAINING, true)],
            )
            .unwrap(),
            AdEntry::new(
                "community",
                "Ansys Community",
                "Connect with engineers and get expert help on the forum.",
                vec![CallToAction::new("Join Forum", urls::COMMUNITY, true)],
            )
            .unwrap(),
            AdEntry::new(
                "pymechanical-github",
                "PyMechanical on GitHub",
                "Contribute to the open-source Pythonic interface for Mechanical.",
                vec![CallToAction::new("View Repository", urls::PYMECHANICAL, true)],
            )
            .unwrap(),
        ])
        .unwrap();

        let footer = Catalog::new(vec![
            AdEntry::new(
                "mechanical-suite",
                "Discover Ansys Mechanical Suite",
                "Complete structural simulation solution for complex engineering challenges. \
                 From linear static analysis to advanced nonlinear simulations.",
                vec![
                    CallToAction::new("Try Mechanical", urls::MECHANICAL, true),
                    CallToAction::new("View Documentation", urls::DOCUMENTATION, false),
                ],
            )
            .unwrap()
            .with_features(vec![
                "Advanced Material Models".to_string(),
                "Contact & Friction Simulation".to_string(),
                "Nonlinear Analysis".to_string(),
                "Fatigue & Durability".to_string(),
                "Optimization Tools".to_string(),
            ]),
            AdEntry::new(
                "academic-program",
                "Ansys Academic Program",
                "Free access to industry-standard simulation software for students and \
                 educators worldwide.",
                vec![
                    CallToAction::new("Get Student License", urls::DOWNLOAD, true),
                    CallToAction::new("Educator Resources", urls::TRAINING, false),
                ],
            )
            .unwrap()
            .with_features(vec![
                "Full-Featured Software".to_string(),
                "Educational Resources".to_string(),
                "Curriculum Support".to_string(),
                "Research Licenses".to_string(),
                "Global Community".to_string(),
            ]),
        ])
        .unwrap();

        Self { sidebar, footer }
    }
}
