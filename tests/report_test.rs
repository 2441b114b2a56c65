mod utils;

use estatais_panel::report::export::{COUNTS_FILE, RESULTS_FILE};
use estatais_panel::report::pages::comparison_records;
use estatais_panel::report::render::{render_json, render_text};
use estatais_panel::report::{Block, NoticeLevel, PageReport};
use estatais_panel::{Dataset, Page, PanelConfig, build_all, build_page, export_comparison};
use utils::{load_sample, test_config, write_file};

fn warnings(page: &PageReport) -> Vec<String> {
    page.sections
        .iter()
        .flat_map(|s| s.notices(NoticeLevel::Warning))
        .map(str::to_string)
        .collect()
}

#[test]
fn every_page_builds_from_the_sample() {
    let dataset = load_sample();
    let pages = build_all(&dataset, &test_config()).unwrap();

    let slugs: Vec<&str> = pages.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["home", "companies", "governance", "results", "government", "states"]
    );
    for page in &pages {
        assert!(!page.sections.is_empty(), "{} has no sections", page.slug);
    }
}

#[test]
fn governance_page_without_warnings() {
    let page = build_page(Page::Governance, &load_sample(), &test_config()).unwrap();

    assert!(warnings(&page).is_empty());
    assert_eq!(page.sections.len(), 4);
    let text = render_text(&page);
    assert!(text.contains("CA,CF,COAUD"));
    assert!(text.contains("Nenhum"));
}

#[test]
fn year_without_records_is_a_notice() {
    let config = PanelConfig {
        focus_year: 2019,
        ..test_config()
    };
    let page = build_page(Page::Governance, &load_sample(), &config).unwrap();

    assert_eq!(page.sections.len(), 1);
    assert_eq!(
        warnings(&page),
        vec!["Nenhum dado disponível para DF em 2019.".to_string()]
    );
}

#[test]
fn missing_columns_become_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "dados.csv",
        "Estado,Ano,emp,dep\nDF,2023,BRB,Não Dependente\nDF,2023,EMATER,Dependente\n",
    );
    let dataset = Dataset::from_path(&path, &test_config()).unwrap();

    let government = build_page(Page::Government, &dataset, &test_config()).unwrap();
    assert_eq!(government.sections.len(), 1);
    assert_eq!(
        warnings(&government),
        vec!["Coluna 'Resultado para o Estado Acionista' não encontrada nos dados.".to_string()]
    );

    let governance = build_page(Page::Governance, &dataset, &test_config()).unwrap();
    assert!(
        warnings(&governance)
            .iter()
            .any(|w| w == "Coluna 'gov_ca' não encontrada nos dados.")
    );

    // the dependency section still renders
    let companies = build_page(Page::Companies, &dataset, &test_config()).unwrap();
    assert!(
        companies
            .sections
            .iter()
            .any(|s| s.blocks.iter().any(|b| matches!(b, Block::Table(_))))
    );
}

#[test]
fn json_output_wraps_pages() {
    let dataset = load_sample();
    let page = build_page(Page::Results, &dataset, &test_config()).unwrap();
    let json = render_json(&[page], dataset.source()).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["pages"][0]["slug"], "results");
    assert!(
        value["source"]
            .as_str()
            .unwrap()
            .ends_with("estatais_sample.csv")
    );
}

#[test]
fn comparison_export_writes_two_files() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("export");
    let config = PanelConfig {
        comparison_years: vec![2023],
        ..test_config()
    };

    let written = export_comparison(&load_sample(), &config, &out).unwrap();

    assert_eq!(written, vec![out.join(COUNTS_FILE), out.join(RESULTS_FILE)]);
    let counts = std::fs::read_to_string(out.join(COUNTS_FILE)).unwrap();
    let mut lines = counts.lines();
    assert_eq!(
        lines.next(),
        Some(
            "Estado,Ano,Abastecimento,Agropecuária,Energia,Financeiro,Habitação e Urbanização,Saneamento,Serviços"
        )
    );
    assert_eq!(lines.next(), Some("DF,2023,1,1,1,1,1,1,1"));
    assert_eq!(lines.next(), Some("SP,2023,0,0,1,0,0,1,0"));
    assert_eq!(lines.next(), None);

    let results = std::fs::read_to_string(out.join(RESULTS_FILE)).unwrap();
    assert_eq!(results.lines().count(), 3);
}

#[test]
fn comparison_selection_combines_years_and_states() {
    let dataset = load_sample();
    let config = PanelConfig {
        comparison_years: vec![2022, 2023],
        comparison_states: vec!["SP".to_string()],
        ..test_config()
    };
    let records = comparison_records(&dataset, &config).unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.state == "SP"));

    let everything = comparison_records(&dataset, &test_config()).unwrap();
    assert_eq!(everything.len(), utils::SAMPLE_ROWS);
}
