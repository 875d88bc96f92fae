//! 名詞レンマタイザ
//!
//! WordNetのmorphy方式に倣い、不規則形の辞書と語尾規則で
//! トークンを辞書形に戻す。
//!
//! ## 処理順
//! 1. 不規則形辞書（feet→foot, diagnoses→diagnosis）
//! 2. 不変語（diabetes, mellitus など）はそのまま
//! 3. 語尾規則（sses→ss, ies→y, xes→x, ches→ch, shes→sh, s→）
//!
//! 戻り値は必ず不動点になる（`lemmatize(lemmatize(w)) == lemmatize(w)`）。

use std::collections::{HashMap, HashSet};

/// 不規則な複数形 → 辞書形
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    // 一般英語
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("children", "child"),
    ("women", "woman"),
    ("men", "man"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("geese", "goose"),
    ("people", "person"),
    ("knives", "knife"),
    ("lives", "life"),
    ("wives", "wife"),
    ("halves", "half"),
    ("calves", "calf"),
    ("leaves", "leaf"),
    ("hooves", "hoof"),
    // ラテン語・ギリシャ語由来の医学用語
    ("diagnoses", "diagnosis"),
    ("prognoses", "prognosis"),
    ("metastases", "metastasis"),
    ("neuroses", "neurosis"),
    ("psychoses", "psychosis"),
    ("stenoses", "stenosis"),
    ("thromboses", "thrombosis"),
    ("fibroses", "fibrosis"),
    ("anastomoses", "anastomosis"),
    ("bacteria", "bacterium"),
    ("fungi", "fungus"),
    ("bronchi", "bronchus"),
    ("calculi", "calculus"),
    ("nuclei", "nucleus"),
    ("bacilli", "bacillus"),
    ("emboli", "embolus"),
    ("thrombi", "thrombus"),
    ("vertebrae", "vertebra"),
    ("pleurae", "pleura"),
    ("fistulae", "fistula"),
    ("phalanges", "phalanx"),
    ("appendices", "appendix"),
    ("cervices", "cervix"),
    ("cortices", "cortex"),
    ("apices", "apex"),
    ("indices", "index"),
    ("foramina", "foramen"),
    ("lumina", "lumen"),
    ("ganglia", "ganglion"),
    ("criteria", "criterion"),
    ("carcinomata", "carcinoma"),
    ("ova", "ovum"),
];

/// 語尾が s でも単数として扱う語
const INVARIANT_WORDS: &[&str] = &[
    "diabetes",
    "herpes",
    "rabies",
    "measles",
    "mumps",
    "scabies",
    "rickets",
    "shingles",
    "species",
    "series",
    "aids",
    "lues",
    "feces",
    "faeces",
    "ascites",
    "tabes",
    "caries",
    "pubes",
    "nares",
    "biceps",
    "triceps",
    "quadriceps",
    "forceps",
    "menses",
    "lens",
    "pancreas",
    "atlas",
    "news",
];

/// 単数形として扱う語尾（-us, -is, -ss）
const SINGULAR_SUFFIXES: &[&str] = &["us", "is", "ss"];

/// 名詞レンマタイザ
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    irregular: HashMap<String, String>,
    invariant: HashSet<String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    /// 組み込み辞書でレンマタイザを作成
    pub fn new() -> Self {
        Self {
            irregular: IRREGULAR_FORMS
                .iter()
                .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
                .collect(),
            invariant: INVARIANT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// 不規則形を追加
    ///
    /// 辞書形がさらに変化しないよう、辞書形は不変語にも登録する。
    pub fn add_irregular(&mut self, form: &str, lemma: &str) {
        let lemma = lemma.to_lowercase();
        self.irregular.insert(form.to_lowercase(), lemma.clone());
        self.invariant.insert(lemma);
    }

    /// 不変語を追加
    pub fn add_invariant(&mut self, word: &str) {
        self.invariant.insert(word.to_lowercase());
    }

    /// トークンを辞書形に変換
    ///
    /// 英小文字のみのトークンが対象。数字・ハイフンを含むトークンはそのまま返す。
    pub fn lemmatize(&self, token: &str) -> String {
        if let Some(lemma) = self.irregular.get(token) {
            return lemma.clone();
        }

        if self.invariant.contains(token) || !token.chars().all(|c| c.is_ascii_lowercase()) {
            return token.to_string();
        }

        let stemmed = apply_suffix_rules(token);

        // 規則適用後の形が不規則形なら辞書形まで戻す（例: feets → feet → foot）
        match self.irregular.get(&stemmed) {
            Some(lemma) => lemma.clone(),
            None => stemmed,
        }
    }
}

/// 語尾規則を適用
fn apply_suffix_rules(token: &str) -> String {
    let len = token.len();

    if len < 4 || SINGULAR_SUFFIXES.iter().any(|s| token.ends_with(s)) {
        return token.to_string();
    }

    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{}ss", stem);
    }
    if len > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{}y", stem);
        }
    }
    if let Some(stem) = token.strip_suffix("xes") {
        return format!("{}x", stem);
    }
    if token.ends_with("ches") && !token.ends_with("aches") {
        return token[..len - 2].to_string();
    }
    if let Some(stem) = token.strip_suffix("shes") {
        return format!("{}sh", stem);
    }
    if let Some(stem) = token.strip_suffix('s') {
        return stem.to_string();
    }

    token.to_string()
}
