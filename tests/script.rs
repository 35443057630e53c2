use std::path::PathBuf;

use ljmd::output::{GsdFile, OpenMode};
use ljmd::{Runner, ScriptConfig};

fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ljmd-script-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn short_config() -> ScriptConfig {
    let mut config = ScriptConfig::default();
    config.context.num_threads = Some(2);
    config.run.steps = 400;
    config.dump.period = 200;
    config
}

/// Header and numeric rows of the log file
fn log_table(dir: &PathBuf) -> (Vec<String>, Vec<Vec<f64>>) {
    let text = std::fs::read_to_string(dir.join("log-output.log")).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap().split('\t').map(String::from).collect();
    let rows = lines
        .map(|l| l.split('\t').map(|v| v.parse().unwrap()).collect())
        .collect();
    (header, rows)
}

fn log_rows(dir: &PathBuf) -> Vec<(usize, f64)> {
    let (header, rows) = log_table(dir);
    assert_eq!(header, ["timestep", "potential_energy"]);
    rows.into_iter().map(|r| (r[0] as usize, r[1])).collect()
}

#[test]
fn reference_script_writes_both_outputs() {
    let dir = output_dir("reference");
    let summary = Runner::new(ScriptConfig::default())
        .with_output_dir(&dir)
        .run()
        .unwrap();
    assert_eq!(summary.steps, 10000);
    assert_eq!(summary.final_step, 10000);
    assert_eq!(summary.num_particles, 125);

    let rows = log_rows(&dir);
    assert_eq!(rows.len(), 101);
    for (k, (step, pe)) in rows.iter().enumerate() {
        assert_eq!(*step, 100 * k);
        assert!(pe.is_finite());
    }
    // a = 2.0 puts nearest neighbors in the attractive well
    assert!(rows[0].1 < 0.0);

    let mut gsd = GsdFile::open(dir.join("trajectory.gsd"), OpenMode::ReadOnly).unwrap();
    assert_eq!(gsd.schema(), "hoomd");
    assert_eq!(gsd.nframes(), 6);
    for frame in 0..6 {
        let step = gsd.read_chunk::<u64>(frame, "configuration/step").unwrap();
        assert_eq!(step, Some(vec![2000 * frame]));
        let positions = gsd.read_chunk::<f32>(frame, "particles/position").unwrap().unwrap();
        assert_eq!(positions.len(), 375);
        assert!(positions.iter().all(|x| x.abs() <= 5.0));
    }
}

#[test]
fn thermostat_holds_the_reference_temperature() {
    let dir = output_dir("temperature");
    let mut config = ScriptConfig::default();
    config.log.quantities = vec!["potential_energy".to_string(), "temperature".to_string()];
    Runner::new(config).with_output_dir(&dir).run().unwrap();

    let (header, rows) = log_table(&dir);
    assert_eq!(header, ["timestep", "potential_energy", "temperature"]);
    let second_half: Vec<f64> = rows
        .iter()
        .filter(|r| r[0] >= 5000.0)
        .map(|r| r[2])
        .collect();
    assert_eq!(second_half.len(), 51);
    let mean = second_half.iter().sum::<f64>() / second_half.len() as f64;
    assert!((mean - 0.2).abs() < 0.02, "mean temperature {}", mean);
}

#[test]
fn same_seed_same_log() {
    let a = output_dir("seed-a");
    let b = output_dir("seed-b");
    Runner::new(short_config()).with_output_dir(&a).run().unwrap();
    Runner::new(short_config()).with_output_dir(&b).run().unwrap();
    assert_eq!(log_rows(&a), log_rows(&b));

    let c = output_dir("seed-c");
    let mut config = short_config();
    config.integrator.seed = 7;
    Runner::new(config).with_output_dir(&c).run().unwrap();
    assert_ne!(log_rows(&a)[1..], log_rows(&c)[1..]);
    // the initial lattice does not depend on the seed
    assert_eq!(log_rows(&a)[0], log_rows(&c)[0]);
}

#[test]
fn overwrite_replaces_previous_outputs() {
    let dir = output_dir("overwrite");
    Runner::new(short_config()).with_output_dir(&dir).run().unwrap();
    Runner::new(short_config()).with_output_dir(&dir).run().unwrap();
    assert_eq!(log_rows(&dir).len(), 5);
    let gsd = GsdFile::open(dir.join("trajectory.gsd"), OpenMode::ReadOnly).unwrap();
    assert_eq!(gsd.nframes(), 3);
}

#[test]
fn append_mode_extends_outputs() {
    let dir = output_dir("append");
    let mut config = short_config();
    config.log.overwrite = false;
    config.dump.overwrite = false;
    Runner::new(config.clone()).with_output_dir(&dir).run().unwrap();
    Runner::new(config).with_output_dir(&dir).run().unwrap();

    let steps: Vec<usize> = log_rows(&dir).into_iter().map(|(s, _)| s).collect();
    assert_eq!(steps, vec![0, 100, 200, 300, 400, 0, 100, 200, 300, 400]);
    let mut gsd = GsdFile::open(dir.join("trajectory.gsd"), OpenMode::ReadOnly).unwrap();
    assert_eq!(gsd.nframes(), 6);
    assert_eq!(gsd.read_chunk::<u64>(3, "configuration/step").unwrap(), Some(vec![0]));
}

#[test]
fn config_file_round_trip() {
    let dir = output_dir("config-file");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("run.json");
    std::fs::write(
        &path,
        r#"{"run": {"steps": 100}, "log": {"period": 50, "quantities": ["potential_energy"]}}"#,
    )
    .unwrap();
    let config = ScriptConfig::from_file(&path).unwrap();
    let summary = Runner::new(config).with_output_dir(&dir).run().unwrap();
    assert_eq!(summary.final_step, 100);
    assert_eq!(log_rows(&dir).len(), 3);
}
