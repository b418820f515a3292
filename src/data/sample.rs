//! Built-in sample data
//!
//! Sample field, race list and the parameter catalogs the robot wizard offers.

use crate::models::{Category, Horse, Race};

/// Tendency parameter offered in wizard step 2
#[derive(Debug, Clone, PartialEq)]
pub struct TendencyOption {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// Sub-category offered inside a race parameter group
#[derive(Debug, Clone, PartialEq)]
pub struct SubCategoryOption {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// Race parameter group offered in wizard step 3
#[derive(Debug, Clone, PartialEq)]
pub struct RaceCategoryOption {
    pub category: &'static str,
    pub sub_categories: Vec<SubCategoryOption>,
}

/// Sample field of 8 horses
pub fn horses() -> Vec<Horse> {
    [
        (1, "トウカイテイオー", 3.2, 0.75),
        (2, "ディープインパクト", 2.8, 0.82),
        (3, "オグリキャップ", 4.1, 0.68),
        (4, "シンボリルドルフ", 5.5, 0.61),
        (5, "メジロマックイーン", 6.2, 0.55),
        (6, "ナリタタイシン", 7.8, 0.48),
        (7, "エアグルーヴ", 8.5, 0.42),
        (8, "サイレンススズカ", 9.2, 0.38),
    ]
    .into_iter()
    .map(|(id, name, odds, place_rate)| Horse {
        id,
        name: name.to_string(),
        odds,
        place_rate,
    })
    .collect()
}

/// Sample race list
pub fn races() -> Vec<Race> {
    (1..=5)
        .map(|i| Race {
            id: i,
            name: format!("第1回 東京競馬場 {}R", i),
            date: "2024-01-15".to_string(),
        })
        .collect()
}

/// Tendency parameter catalog
pub fn tendency_options() -> Vec<TendencyOption> {
    vec![
        TendencyOption {
            id: 1,
            name: "血統分析",
            description: "血統による能力予測",
        },
        TendencyOption {
            id: 2,
            name: "調教師実績",
            description: "調教師の過去成績",
        },
        TendencyOption {
            id: 3,
            name: "騎手実績",
            description: "騎手の過去成績",
        },
        TendencyOption {
            id: 4,
            name: "馬場適性",
            description: "馬場条件への適応性",
        },
        TendencyOption {
            id: 5,
            name: "距離適性",
            description: "レース距離への適応性",
        },
        TendencyOption {
            id: 6,
            name: "天候適性",
            description: "天候条件への適応性",
        },
        TendencyOption {
            id: 7,
            name: "出走間隔",
            description: "前走からの経過日数",
        },
        TendencyOption {
            id: 8,
            name: "負担重量",
            description: "負担重量の影響度",
        },
    ]
}

/// Scoring statistics for each tendency parameter
///
/// Ids line up with [`tendency_options`].
pub fn categories() -> Vec<Category> {
    let stats = [
        (0.72, 0.85),
        (0.68, 0.78),
        (0.75, 0.82),
        (0.70, 0.80),
        (0.65, 0.75),
        (0.73, 0.83),
        (0.67, 0.77),
        (0.69, 0.79),
    ];

    tendency_options()
        .into_iter()
        .zip(stats)
        .map(|(option, (place_rate, efficiency))| Category {
            id: option.id,
            name: option.name.to_string(),
            place_rate,
            efficiency,
        })
        .collect()
}

fn group(
    category: &'static str,
    first_id: u32,
    subs: [(&'static str, &'static str); 6],
) -> RaceCategoryOption {
    RaceCategoryOption {
        category,
        sub_categories: subs
            .into_iter()
            .enumerate()
            .map(|(i, (name, description))| SubCategoryOption {
                id: first_id + i as u32,
                name,
                description,
            })
            .collect(),
    }
}

/// Race parameter catalog (5 groups x 6 sub-categories)
pub fn race_category_options() -> Vec<RaceCategoryOption> {
    vec![
        group(
            "騎手",
            1,
            [
                ("勝率", "騎手の勝率"),
                ("複勝率", "騎手の複勝率"),
                ("平均順位", "騎手の平均順位"),
                ("重賞実績", "重賞での実績"),
                ("距離適性", "距離別の成績"),
                ("馬場適性", "馬場別の成績"),
            ],
        ),
        group(
            "調教師",
            7,
            [
                ("勝率", "調教師の勝率"),
                ("複勝率", "調教師の複勝率"),
                ("出走数", "年間出走数"),
                ("重賞実績", "重賞での実績"),
                ("距離適性", "距離別の成績"),
                ("馬場適性", "馬場別の成績"),
            ],
        ),
        group(
            "馬場",
            13,
            [
                ("芝適性", "芝コースでの成績"),
                ("ダート適性", "ダートコースでの成績"),
                ("良馬場", "良馬場での成績"),
                ("重馬場", "重馬場での成績"),
                ("稍重馬場", "稍重馬場での成績"),
                ("不良馬場", "不良馬場での成績"),
            ],
        ),
        group(
            "距離",
            19,
            [
                ("短距離", "1000m〜1400m"),
                ("マイル", "1600m"),
                ("中距離", "1800m〜2000m"),
                ("長距離", "2200m〜3200m"),
                ("上り坂", "上り坂での成績"),
                ("下り坂", "下り坂での成績"),
            ],
        ),
        group(
            "天候",
            25,
            [
                ("晴天", "晴天時の成績"),
                ("雨天", "雨天時の成績"),
                ("曇天", "曇天時の成績"),
                ("風速", "風速の影響"),
                ("気温", "気温の影響"),
                ("湿度", "湿度の影響"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_horses() {
        let horses = horses();
        assert_eq!(horses.len(), 8);
        assert!(horses.iter().all(|h| h.odds > 0.0));
        assert!(horses.iter().all(|h| (0.0..=1.0).contains(&h.place_rate)));
    }

    #[test]
    fn test_categories_match_tendency_options() {
        let options = tendency_options();
        let categories = categories();
        assert_eq!(categories.len(), options.len());
        for (c, o) in categories.iter().zip(&options) {
            assert_eq!(c.id, o.id);
            assert_eq!(c.name, o.name);
        }
    }

    #[test]
    fn test_race_category_ids_unique() {
        let groups = race_category_options();
        assert_eq!(groups.len(), 5);

        let ids: HashSet<u32> = groups
            .iter()
            .flat_map(|g| g.sub_categories.iter().map(|s| s.id))
            .collect();
        assert_eq!(ids.len(), 30);
        assert_eq!(groups[4].sub_categories[5].id, 30);
    }
}
