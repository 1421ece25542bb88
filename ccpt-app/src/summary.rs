use ccpt_core::TrialResult;

/// End-of-session report printed to the operator.
pub fn print_summary(results: &[TrialResult]) {
    if results.is_empty() {
        return;
    }

    let targets = results.iter().filter(|r| r.trial.is_target).count();
    let hits = results
        .iter()
        .filter(|r| r.trial.is_target && r.responded)
        .count();
    let false_alarms = results
        .iter()
        .filter(|r| !r.trial.is_target && r.responded)
        .count();
    let non_targets = results.len() - targets;
    let accuracy = results.iter().filter(|r| r.correct).count() as f64 / results.len() as f64;

    let times: Vec<f64> = results
        .iter()
        .filter_map(|r| r.reaction_time)
        .map(|d| d.as_secs_f64() * 1e3)
        .collect();

    println!("\nSession results:");
    println!(
        "Trials: {}, accuracy {:.1}%",
        results.len(),
        accuracy * 100.0
    );
    if targets > 0 {
        println!("Hits: {hits}/{targets}");
    }
    if non_targets > 0 {
        println!("False alarms: {false_alarms}/{non_targets}");
    }
    if !times.is_empty() {
        let mean = times.iter().sum::<f64>() / times.len() as f64;
        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        println!("Reaction times: mean {mean:.1} ms, min {min:.1} ms, max {max:.1} ms");
    }
}
