//! End-to-end derivation scenarios: a regulation bundle goes through the
//! in-memory supplier and the resolver, per entity kind.

use rust_decimal::Decimal;
use serde_json::json;

use payroll_core::{Attributes, OverrideType, PayrollError, PayrollResult, RegulationId};
use payroll_derivation::entities::{
    Case, CaseRelation, CaseRelationKey, Collector, LookupValue, Report, ReportParameter,
    ReportParameterKey, ReportTemplate, Script, WageType, WageTypeNumber,
};
use payroll_derivation::{
    verify_ownership, Candidate, CandidateSupplier, ClusterSet, Derivable, DerivationQuery,
    DerivationResolver, RegulationStore,
};

const BUNDLE: &str = r#"
payroll:
  id: 1
  tenant_id: 1
  name: CH Monthly
  layers:
    - { level: 0, regulation_id: 10 }
    - { level: 1, regulation_id: 20 }
    - { level: 1, priority: 5, regulation_id: 30 }
regulations:
  - regulation: { id: 10, tenant_id: 2, name: CH.Base, shared_regulation: true }
    objects:
      collectors:
        - { name: Vacation, clusters: [base] }
      cases:
        - name: Employee
          description: Employee master data
          attributes: { x: 1 }
          build_actions: [SetDefaults]
      case_relations:
        - { source_case_name: Birth, target_case_name: Address, source_case_slot: home, order: 1, build_expression: BuildHome }
        - { source_case_name: Birth, target_case_name: Address, source_case_slot: work, order: 2 }
      lookup_values:
        - { lookup_name: Canton, key: ZH, value: '"Zurich"' }
        - { lookup_name: Region, key: ZH, value: '"East"' }
      wage_types:
        - { wage_type_number: 1000, name: Salary, collectors: [Gross] }
      scripts:
        - { name: Rules, function_types: [collector_start], value: "base()" }
      reports:
        - name: Overview
          queries: { employees: QueryEmployees, wages: QueryWages }
      report_parameters:
        - { report_name: Payslip, name: Year, description: Payslip year }
        - { report_name: Journal, name: Year, description: Journal year }
      report_templates:
        - { report_name: Payslip, name: Payslip, culture: de-CH, content: DE }
  - regulation: { id: 20, tenant_id: 1, name: Company }
    objects:
      collectors:
        - { name: Vacation, threshold: 5, clusters: [region] }
      cases:
        - name: Employee
          description: ""
          attributes: { x: 2, y: 3 }
          build_actions: [SetCompanyDefaults]
      case_relations:
        - { source_case_name: Birth, target_case_name: Address, source_case_slot: home, order: 0, build_expression: "" }
      lookup_values:
        - { lookup_name: Canton, key: ZH, value: '"Zürich"' }
      wage_types:
        - { wage_type_number: "1000.0", collectors: [Net] }
      scripts:
        - { name: Rules, function_types: [wage_type_value] }
      reports:
        - name: Overview
          queries: { wages: QueryCompanyWages }
      report_parameters:
        - { report_name: Payslip, name: Year, description: "", value: "2025" }
      report_templates:
        - { report_name: Payslip, name: Payslip, culture: en-US, content: EN }
  - regulation: { id: 30, tenant_id: 1, name: Department }
    objects:
      scripts:
        - { name: Rules, override_type: inactive, value: "department()" }
"#;

fn store() -> RegulationStore {
    RegulationStore::from_yaml_str(BUNDLE).unwrap()
}

fn query() -> DerivationQuery {
    let payroll = store().payroll().clone();
    DerivationQuery::new(payroll.tenant_id, payroll.id)
}

fn resolve<T: Derivable>(query: &DerivationQuery) -> payroll_derivation::Resolution<T> {
    DerivationResolver::default().resolve_from(&store(), query).unwrap()
}

#[test]
fn vacation_collector_scenario() {
    let resolution = resolve::<Collector>(&query());
    let vacation = resolution.get(&"Vacation".to_string()).unwrap();
    assert_eq!(vacation.effective.object.threshold, Some(Decimal::from(5)));
    assert_eq!(vacation.effective.object.clusters, vec!["region", "base"]);
    assert_eq!(vacation.effective.level, 1);
}

#[test]
fn case_attributes_least_specific_wins() {
    let resolution = resolve::<Case>(&query());
    let employee = &resolution.effective_objects()[0];
    let expected = Attributes::from([("x".to_string(), json!(1)), ("y".to_string(), json!(3))]);
    assert_eq!(employee.attributes, expected);
    assert_eq!(employee.description.as_deref(), Some("Employee master data"));
    assert_eq!(employee.build_actions, vec!["SetCompanyDefaults", "SetDefaults"]);
}

#[test]
fn case_relation_slots_stay_separate() {
    let resolution = resolve::<CaseRelation>(&query());
    assert_eq!(resolution.len(), 2);

    let home = CaseRelationKey {
        source_case_name: "Birth".into(),
        target_case_name: "Address".into(),
        source_case_slot: Some("home".into()),
        target_case_slot: None,
    };
    let home_group = resolution.get(&home).unwrap();
    assert_eq!(home_group.depth(), 2);

    let work = CaseRelationKey { source_case_slot: Some("work".into()), ..home };
    let work_group = resolution.get(&work).unwrap();
    assert_eq!(work_group.depth(), 1);
    assert_eq!(work_group.effective.object.order, Some(2));
}

#[test]
fn lookup_values_keyed_by_lookup_and_key() {
    let resolution = resolve::<LookupValue>(&query());
    assert_eq!(resolution.len(), 2);
    let values: Vec<_> = resolution
        .effective_objects()
        .iter()
        .map(|v| (v.lookup_name.as_str(), v.value.as_deref()))
        .collect();
    assert_eq!(values, vec![("Canton", Some("\"Zürich\"")), ("Region", Some("\"East\""))]);

    // Row-key narrowing matches rows of every lookup.
    let narrowed = resolve::<LookupValue>(&query().with_keys(["ZH"]));
    assert_eq!(narrowed.len(), 2);
}

#[test]
fn wage_type_numbers_group_by_value() {
    let resolution = resolve::<WageType>(&query());
    assert_eq!(resolution.len(), 1);
    let salary = resolution.get(&WageTypeNumber(Decimal::from(1000))).unwrap();
    assert_eq!(salary.depth(), 2);
    assert_eq!(salary.effective.object.name, "Salary");
    assert_eq!(salary.effective.object.collectors, vec!["Net", "Gross"]);

    let narrowed = resolve::<WageType>(&query().with_keys(["1000"]));
    assert_eq!(narrowed.len(), 1);
}

#[test]
fn priority_breaks_level_ties() {
    let resolution = resolve::<Script>(&query());
    let rules = &resolution.groups[0];
    let regulations: Vec<i64> = rules.layers().map(|c| c.regulation_id.get()).collect();
    assert_eq!(regulations, vec![30, 20, 10]);
    assert_eq!(rules.effective.object.value.as_deref(), Some("department()"));
    assert_eq!(rules.effective.object.function_types.len(), 2);
}

#[test]
fn override_gate_uses_most_specific_layer() {
    let active = resolve::<Script>(&query().with_override_type(OverrideType::Active));
    assert!(active.is_empty());
    assert_eq!(active.stats.filtered_candidates, 3);

    let inactive = resolve::<Script>(&query().with_override_type(OverrideType::Inactive));
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive.groups[0].depth(), 3);
}

#[test]
fn empty_text_and_zero_fall_through_to_base() {
    let cases = resolve::<Case>(&query());
    let employee = &cases.effective_objects()[0];
    assert_eq!(employee.description.as_deref(), Some("Employee master data"));

    let relations = resolve::<CaseRelation>(&query());
    let home = &relations.groups[0].effective.object;
    assert_eq!(home.source_case_slot.as_deref(), Some("home"));
    assert_eq!(home.order, Some(1));
    assert_eq!(home.build_expression.as_deref(), Some("BuildHome"));
}

#[test]
fn report_parameters_scoped_to_their_report() {
    let resolution = resolve::<ReportParameter>(&query());
    assert_eq!(resolution.len(), 2);

    let payslip = ReportParameterKey { report_name: "Payslip".into(), name: "Year".into() };
    let year = resolution.get(&payslip).unwrap();
    assert_eq!(year.depth(), 2);
    assert_eq!(year.effective.object.value.as_deref(), Some("2025"));
    assert_eq!(year.effective.object.description.as_deref(), Some("Payslip year"));

    let journal = ReportParameterKey { report_name: "Journal".into(), name: "Year".into() };
    assert_eq!(resolution.get(&journal).unwrap().depth(), 1);
}

#[test]
fn report_templates_never_mix_cultures() {
    let resolution = resolve::<ReportTemplate>(&query());
    assert_eq!(resolution.len(), 2);
    for group in &resolution.groups {
        let template = &group.effective.object;
        assert_eq!(group.depth(), 1);
        let expected = if template.culture == "de-CH" { "DE" } else { "EN" };
        assert_eq!(template.content.as_deref(), Some(expected));
    }
}

#[test]
fn report_queries_overlay() {
    let resolution = resolve::<Report>(&query());
    let queries = &resolution.effective_objects()[0].queries;
    assert_eq!(queries["employees"], "QueryEmployees");
    assert_eq!(queries["wages"], "QueryWages");
}

#[test]
fn cluster_sets_narrow_before_grouping() {
    let clusters = ClusterSet { include: Vec::new(), exclude: vec!["region".into()] };
    let resolution = resolve::<Collector>(&query().with_clusters(clusters));
    let vacation = &resolution.groups[0];
    assert_eq!(vacation.depth(), 1);
    assert_eq!(vacation.effective.object.threshold, None);
}

#[test]
fn supplied_candidates_belong_to_the_payroll() {
    let store = store();
    let candidates: Vec<Candidate<Case>> = store.candidates(&query()).unwrap().unwrap();
    verify_ownership(&candidates, store.payroll()).unwrap();

    let stranger = vec![Candidate::new(RegulationId::new(99).unwrap(), 0, 0, Case::default())];
    assert!(matches!(
        verify_ownership(&stranger, store.payroll()),
        Err(PayrollError::UnknownReference { .. })
    ));
}

#[test]
fn resolution_does_not_touch_input() {
    let candidates: Vec<Candidate<Collector>> = store().candidates(&query()).unwrap().unwrap();
    let before = candidates.clone();
    let resolution = DerivationResolver::default().resolve(candidates.clone(), None).unwrap();
    assert_eq!(candidates, before);
    assert_eq!(resolution.into_candidates().len(), before.len());
}

struct Silent;

impl CandidateSupplier<Collector> for Silent {
    fn candidates(&self, _query: &DerivationQuery) -> PayrollResult<Option<Vec<Candidate<Collector>>>> {
        Ok(None)
    }
}

struct Broken;

impl CandidateSupplier<Collector> for Broken {
    fn candidates(&self, query: &DerivationQuery) -> PayrollResult<Option<Vec<Candidate<Collector>>>> {
        Err(PayrollError::unknown("payroll", query.payroll_id, "broken supplier"))
    }
}

#[test]
fn missing_candidate_list_is_invalid_argument() {
    let err = DerivationResolver::default()
        .resolve_from::<Collector, _>(&Silent, &query())
        .unwrap_err();
    assert!(matches!(err, PayrollError::InvalidArgument(_)));
}

#[test]
fn supplier_errors_propagate() {
    let err = DerivationResolver::default()
        .resolve_from::<Collector, _>(&Broken, &query())
        .unwrap_err();
    assert!(matches!(err, PayrollError::UnknownReference { ref context, .. } if context == "broken supplier"));
}

#[test]
fn blank_key_filter_rejected_before_supply() {
    let err = DerivationResolver::default()
        .resolve_from::<Collector, _>(&Broken, &query().with_keys([" "]))
        .unwrap_err();
    assert!(matches!(err, PayrollError::InvalidArgument(_)));
}
