#![allow(dead_code)]

use drr_scheduler::{FixedEngine, Scheme, ScheduleConfig, ScheduleModel};

/// (home, away) games per round. A balanced four-team schedule without away breaks;
/// its second leg follows the English pattern.
pub const ENGLISH_FOUR: [[(usize, usize); 2]; 6] = [
    [(0, 1), (2, 3)],
    [(3, 0), (1, 2)],
    [(0, 2), (1, 3)],
    [(2, 0), (3, 1)],
    [(1, 0), (3, 2)],
    [(0, 3), (2, 1)],
];

/// Full assignment for a schedule: the match variables plus the home-away and
/// away-break indicators they imply.
pub fn assignment(teams: usize, rounds: &[[(usize, usize); 2]]) -> Vec<(String, f64)> {
    let mut home = vec![vec![false; rounds.len()]; teams];
    let mut values = Vec::new();
    for (k, games) in rounds.iter().enumerate() {
        for (h, a) in games.iter().copied() {
            home[h][k] = true;
            values.push((format!("x_{}_{}_{}", h, a, k), 1.0));
        }
    }
    for i in 0..teams {
        for k in (0..rounds.len()).step_by(2) {
            let y = home[i][k] && !home[i][k + 1];
            let w = !home[i][k] && !home[i][k + 1];
            values.push((format!("y_{}_{}", i, k), if y { 1.0 } else { 0.0 }));
            values.push((format!("w_{}_{}", i, k), if w { 1.0 } else { 0.0 }));
        }
    }
    values
}

pub fn fixed_model(
    scheme: Scheme,
    top_teams: Vec<usize>,
    values: Vec<(String, f64)>,
) -> ScheduleModel<FixedEngine> {
    let config = ScheduleConfig::new(4, scheme).with_top_teams(top_teams);
    ScheduleModel::new(&config, FixedEngine::new(values)).unwrap()
}

pub fn set(values: &mut Vec<(String, f64)>, name: &str, value: f64) {
    values.retain(|(n, _)| n != name);
    values.push((name.to_string(), value));
}
