use srag_weekly::config::{EvaluationMode, PipelineConfig, ReaderConfig};
use srag_weekly::io::writer::{RunSummary, write_cleaned_csv, write_summary, write_weekly};
use srag_weekly::io::{read_extract, read_extracts};
use srag_weekly::pipeline::Pipeline;

use crate::utils::write_file;

const HEADER: &str = "SEM_NOT,DT_NOTIFIC,SG_UF_NOT,FEBRE,TOSSE,GARGANTA,DISPNEIA,SATURACAO,DESC_RESP,EVOLUCAO,IFI,PCR,OUT_METODO,PCR_RES,CULT_RES,HEMA_RES,PCR_ETIOL,HEMA_ETIOL,RES_FLUA,RES_FLUB,RES_VSR,RES_PARA1,RES_PARA2,RES_PARA3,RES_ADNO,RES_OUTRO,CS_SEXO";

fn extract(rows: &[&str]) -> String {
    let mut contents = String::from(HEADER);
    for row in rows {
        contents.push('\n');
        contents.push_str(row);
    }
    contents.push('\n');
    contents
}

/// CSV in, weekly table and cleaned records out
#[test]
fn test_csv_round_trip_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(
        dir.path(),
        "srag_2013.csv",
        &extract(&[
            // symptomatic, no lab data
            "12,20/03/2013,35.0,1,1,,1,,,,,,,,,,,,,,,,,,,,M",
            // death, PCR positive H1N1
            "12,21/03/2013,35,0,1,,,,,2,,,,1,,,1,,,,,,,,,,F",
            // symptomatic, PCR positive flu B
            "12,22/03/2013,SP,1.0,1,,1,,,,,1,,1,,,3,,,,,,,,,,F",
            // outside the case definition
            "12,22/03/2013,35,2,2,2,2,2,2,1,,,,,,,,,,,,,,,,,M",
            // no notification date
            "13,,35,1,1,,1,,,,,,,,,,,,,,,,,,,,M",
            // malformed code
            "13,23/03/2013,35,x,1,,1,,,,,,,,,,,,,,,,,,,,M",
        ]),
    );

    let read = read_extract(&input, &ReaderConfig::default()).unwrap();
    assert_eq!(read.report.rows, 6);
    assert_eq!(read.report.rejected, 1);
    assert_eq!(read.records.len(), 5);

    let output = Pipeline::new(PipelineConfig {
        evaluation: EvaluationMode::Columnar,
        ..PipelineConfig::default()
    })
    .run(read.records)
    .unwrap();
    assert_eq!(output.stats.filter.kept, 3);
    assert_eq!(output.stats.filter.case_definition_not_met, 1);
    assert_eq!(output.stats.filter.incomplete_temporal_key, 1);

    let rows = output.weekly.rows();
    assert_eq!(rows.len(), 2);
    let numeric = &rows[0];
    assert_eq!(numeric.region.as_deref(), Some("35"));
    assert_eq!(numeric.flu_a, 1);
    assert_eq!(numeric.not_tested, 1);
    assert_eq!(numeric.total_cases, 2);
    let abbreviated = &rows[1];
    assert_eq!(abbreviated.region.as_deref(), Some("SP"));
    assert_eq!(abbreviated.flu_b, 1);

    let weekly_path = dir.path().join("weekly.csv");
    write_weekly(&weekly_path, &rows, b',').unwrap();
    let mut reader = csv::Reader::from_path(&weekly_path).unwrap();
    let written: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(written.len(), 2);
    assert_eq!(&written[0][0], "35");
    assert_eq!(&written[0][1], "12");

    let clean_path = dir.path().join("clean.csv");
    let reader_config = ReaderConfig::default();
    write_cleaned_csv(
        &clean_path,
        &output.classified,
        b',',
        &reader_config.date_format_config,
    )
    .unwrap();
    let cleaned = read_extract(&clean_path, &reader_config).unwrap();
    assert_eq!(cleaned.records.len(), 3);
    assert_eq!(cleaned.records[1].lab.pcr_etiology, Some(1));
    assert_eq!(
        cleaned.records[0].passthrough.get("CS_SEXO").map(String::as_str),
        Some("M")
    );

    let summary_path = dir.path().join("summary.json");
    write_summary(
        &summary_path,
        &RunSummary {
            inputs: vec![input.display().to_string()],
            read: &read.report,
            run: &output.stats,
        },
    )
    .unwrap();
    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["read"]["rejected"], 1);
    assert_eq!(summary["run"]["filter"]["kept"], 3);
}

/// Several files concatenate in argument order, with or without shared progress bars
#[test]
fn test_multiple_files_keep_order() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = (1..=4)
        .map(|week| {
            let row = format!("{week},20/03/2013,35,1,1,,1,,,,,,,,,,,,,,,,,,,,M");
            write_file(dir.path(), &format!("part{week}.csv"), &extract(&[row.as_str()]))
        })
        .collect();

    for show_progress in [false, true] {
        let config = ReaderConfig {
            show_progress,
            ..ReaderConfig::default()
        };
        let read = read_extracts(&paths, &config).unwrap();
        assert_eq!(read.report.files, 4);
        let weeks: Vec<i64> = read
            .records
            .iter()
            .filter_map(|r| r.notification_week)
            .collect();
        assert_eq!(weeks, vec![1, 2, 3, 4]);
    }
}

/// Weekly table written as Parquet reads back with the contract columns
#[test]
fn test_weekly_parquet_output() {
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use srag_weekly::algorithm::{LabOutcomeClassifier, WeeklyAggregator};
    use srag_weekly::models::LabFields;
    use srag_weekly::schema::columns::WEEKLY_COLUMNS;

    let records = vec![
        crate::utils::notification("35", 1, LabFields::default()),
        crate::utils::notification("33", 2, LabFields::default()),
    ];
    let rows = WeeklyAggregator::default()
        .aggregate(&LabOutcomeClassifier.classify_all(records))
        .rows();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weekly.parquet");
    write_weekly(&path, &rows, b',').unwrap();

    let file = std::fs::File::open(&path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.map(Result::unwrap).collect();
    let schema = batches[0].schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, WEEKLY_COLUMNS.to_vec());
    assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);
}
