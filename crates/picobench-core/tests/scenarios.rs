//! End-to-end scenario tests driving the public `generate_report` entry
//! point, mirroring the worked examples in the spec's scenario walkthrough.

use picobench_core::{generate_report, DeviceContext};
use std::io::Cursor;

fn run(results: &str, catalogue: &str, context: DeviceContext) -> String {
    let mut out = Vec::new();
    generate_report(
        Cursor::new(results.to_string()),
        Cursor::new(catalogue.to_string()),
        &context,
        &mut out,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn empty_everything_boundary() {
    let report = run("", "", DeviceContext::default());
    assert!(report.starts_with("title,read,write,erase\n"));
    assert!(report.contains("\nundecided,undecided,undecided,NA\n"));
}

#[test]
fn scenario_1_end_to_end() {
    let catalogue = "CHIP_MODEL,JEDEC,50MHZ_READ_SPEED\nX,BF2641,5.0\n";
    let results = "BF2641,read,4096,0x0,800,0\nBF2641,read,4096,0x0,820,0\nBF2641,read,4096,0x0,810,0\n";
    let context = DeviceContext {
        jedec_norm_observed: Some("BF2641".to_string()),
        sck_mhz: 10.0,
        capacity_bytes: 2_097_152,
    };
    let report = run(results, catalogue, context);
    assert!(report.contains("n_4096B,3,0,0\n"));
    assert!(report.contains("db_mean_4096B,1.000,NA,NA\n"));
    assert!(report.contains("possible_chips_4096B,BF2641,NA,NA\n"));
    let final_line = report.lines().last().unwrap();
    assert!(final_line.starts_with("BF2641,X,"));
}

#[test]
fn is_deterministic_across_runs() {
    let catalogue = "CHIP_MODEL,JEDEC,TYP_4KB\nX,AAAAAA,45\n";
    let results = "X,erase,4096,0x0,46000,0\n";
    let context = DeviceContext::default();
    let a = run(results, catalogue, context.clone());
    let b = run(results, catalogue, context);
    assert_eq!(a, b);
}

#[test]
fn scaling_elapsed_scales_ms_stats_linearly() {
    let catalogue = "";
    let results = "X,erase,4096,0x0,1000,0\nX,erase,4096,0x0,2000,0\n";
    let scaled = "X,erase,4096,0x0,3000,0\nX,erase,4096,0x0,6000,0\n";
    let context = DeviceContext::default();
    let base = run(results, catalogue, context.clone());
    let scaled_report = run(scaled, catalogue, context);

    let base_avg = base
        .lines()
        .find(|l| l.starts_with("avg_4096B_ms,"))
        .unwrap()
        .split(',')
        .nth(3)
        .unwrap()
        .parse::<f64>()
        .unwrap();
    let scaled_avg = scaled_report
        .lines()
        .find(|l| l.starts_with("avg_4096B_ms,"))
        .unwrap()
        .split(',')
        .nth(3)
        .unwrap()
        .parse::<f64>()
        .unwrap();
    assert!((scaled_avg - base_avg * 3.0).abs() < 1e-9);
}

#[test]
fn scenario_2_program_with_pages() {
    let catalogue = "CHIP_MODEL,JEDEC,TYP_PAGE_PROGRAM\nX,AAAAAA,0.7\n";
    let results = "X,program,4096,0x0,12000,0\n";
    let context = DeviceContext {
        capacity_bytes: 1_048_576,
        ..Default::default()
    };
    let report = run(results, catalogue, context);
    assert!(report.contains("db_mean_4096B,NA,11.200,NA\n"));
    assert!(report.contains("avg_4096B_ms,NA,12.000,NA\n"));
    assert!(report.contains("possible_chips_4096B,NA,AAAAAA,NA\n"));
}

#[test]
fn scenario_3_erase_selection_by_size() {
    let catalogue = "CHIP_MODEL,JEDEC,TYP_4KB,TYP_32KB,TYP_64KB\nX,EFEF00,45,240,400\n";
    let results = "X,erase,4096,0x0,46000,0\n\
                    X,erase,32768,0x0,238000,0\n\
                    X,erase,65536,0x0,402000,0\n";
    let report = run(results, catalogue, DeviceContext::default());
    assert!(report.contains("db_mean_4096B,NA,NA,45.000\n"));
    assert!(report.contains("db_mean_32768B,NA,NA,240.000\n"));
    assert!(report.contains("db_mean_65536B,NA,NA,400.000\n"));
    assert!(report.contains("conclusion_possible_chips,NA,NA,EFEF00\n"));
}

#[test]
fn scenario_5_no_samples_known_jedec() {
    let catalogue = "CHIP_MODEL,COMPANY,JEDEC\nMX25L,Macronix,C21F17\n";
    let context = DeviceContext {
        jedec_norm_observed: Some("C21F17".to_string()),
        ..Default::default()
    };
    let report = run("", catalogue, context);
    assert!(report.contains("detected_jedec,C21F17,C21F17,C21F17\n"));
    assert!(report.contains("chip_model,MX25L,MX25L,MX25L\n"));
    assert!(report.contains("company,Macronix,Macronix,Macronix\n"));
    assert!(report.contains("n_4096B,0,0,0\n"));
    assert!(report.contains("avg_4096B_ms,NA,NA,NA\n"));
    assert_eq!(
        report.lines().last().unwrap(),
        "C21F17,MX25L,Macronix,0.000"
    );
}

#[test]
fn scenario_4_ambiguity_and_intersection() {
    let catalogue = "CHIP_MODEL,JEDEC,TYP_4KB,TYP_32KB,TYP_64KB\n\
                      A,111111,45,240,400\n\
                      B,222222,45,240,500\n";
    let results = "X,erase,4096,0x0,45000,0\n\
                    X,erase,32768,0x0,240000,0\n\
                    X,erase,65536,0x0,400000,0\n";
    let report = run(results, catalogue, DeviceContext::default());
    assert!(report.contains("possible_chips_4096B,NA,NA,111111/222222\n"));
    assert!(report.contains("possible_chips_32768B,NA,NA,111111/222222\n"));
    assert!(report.contains("possible_chips_65536B,NA,NA,111111\n"));
    assert!(report.contains("conclusion_possible_chips,NA,NA,111111\n"));
}

#[test]
fn scenario_6_malformed_input_resilience() {
    let catalogue = "";
    let good_line = "X,erase,4096,0x0,45000,0";
    let garbage = [
        "truncated",
        "wrong;delimiter;here;too;short;x",
        "X,erase,notasize,0x0,45000,0",
        "X,erase,4096,0x0,-1,0",
    ];

    let clean: String = std::iter::repeat(good_line).take(200).collect::<Vec<_>>().join("\n");
    let mut with_garbage = Vec::new();
    for i in 0..200 {
        with_garbage.push(good_line.to_string());
        if i % 4 == 0 {
            with_garbage.push(garbage[(i / 4) % garbage.len()].to_string());
        }
    }
    let dirty = with_garbage.join("\n");

    let a = run(&clean, catalogue, DeviceContext::default());
    let b = run(&dirty, catalogue, DeviceContext::default());

    let extract = |report: &str| {
        report
            .lines()
            .find(|l| l.starts_with("n_4096B,"))
            .unwrap()
            .to_string()
    };
    assert_eq!(extract(&a), extract(&b));
}
