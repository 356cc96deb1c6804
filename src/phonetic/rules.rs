use super::{ReplacementRule, ReplacementTable};

/// 全角空格, 用于拆开拗音
pub const MORA_SEPARATOR: char = '\u{3000}';

// (平假名, 片假名) 辅音段
const CONSONANT_MORAE: [(char, char); 12] = [
    ('き', 'キ'),
    ('し', 'シ'),
    ('ち', 'チ'),
    ('に', 'ニ'),
    ('ひ', 'ヒ'),
    ('み', 'ミ'),
    ('り', 'リ'),
    ('ぎ', 'ギ'),
    ('じ', 'ジ'),
    ('ぢ', 'ヂ'),
    ('び', 'ビ'),
    ('ぴ', 'ピ'),
];

// 小写 ya/yu/yo
const SMALL_Y_MORAE: [(char, char); 3] = [('ゃ', 'ャ'), ('ゅ', 'ュ'), ('ょ', 'ョ')];

/// 拗音表: `きょ` -> `キ　ョ`
pub fn contracted_sounds() -> ReplacementTable {
    let rules = CONSONANT_MORAE
        .iter()
        .flat_map(|&(hira, kata)| {
            SMALL_Y_MORAE.iter().map(move |&(small_hira, small_kata)| ReplacementRule {
                from: format!("{hira}{small_hira}"),
                to: format!("{kata}{MORA_SEPARATOR}{small_kata}"),
            })
        })
        .collect();

    ReplacementTable {
        name: "contracted-sounds".into(),
        rules,
    }
}

/// 长音表: `ョう` -> `ョー`
///
/// 片假名形式先于平假名形式匹配。
pub fn long_vowels() -> ReplacementTable {
    let pairs = [
        ("ュう", "ュー"),
        ("ョう", "ョー"),
        ("ゅう", "ゅー"),
        ("ょう", "ょー"),
    ];

    ReplacementTable {
        name: "long-vowels".into(),
        rules: pairs
            .iter()
            .map(|(from, to)| ReplacementRule {
                from: (*from).to_string(),
                to: (*to).to_string(),
            })
            .collect(),
    }
}
