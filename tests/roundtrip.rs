use ctd_rs::model::{NodeConfiguration, Parameter, RelocationContext};
use ctd_rs::xml::{self, XmlError};
use ctd_rs::ModelError;

const DESCRIPTOR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tool name="PeakPicker" version="3.1.0" docurl="http://example.org/PeakPicker" category="Signal processing">
	<description>Finds peaks in profile data</description>
	<manual>Run after baseline filtering.</manual>
	<executableName>PeakPicker</executableName>
	<cli>
		<clielement optionIdentifier="-in" isList="false">
			<mapping referenceName="PeakPicker.1.in"/>
		</clielement>
		<clielement optionIdentifier="-out" isList="false">
			<mapping referenceName="PeakPicker.1.out"/>
		</clielement>
		<clielement optionIdentifier="-ms_levels" isList="true">
			<mapping referenceName="PeakPicker.1.algorithm.ms_levels"/>
		</clielement>
		<clielement optionIdentifier="-signal_to_noise" isList="false">
			<mapping referenceName="PeakPicker.1.algorithm.signal_to_noise"/>
		</clielement>
		<clielement optionIdentifier="-force" isList="false">
			<mapping referenceName="PeakPicker.1.force"/>
		</clielement>
	</cli>
	<relocators>
		<relocator reference="PeakPicker.1.out" locations="%PWD%/%BASENAME[PeakPicker.1.in]%_picked.mzML"/>
	</relocators>
	<citations>
		<citation doi="10.1021/pr900171m" url="https://doi.org/10.1021/pr900171m"/>
	</citations>
	<PARAMETERS version="1.3" xsi:noNamespaceSchemaLocation="http://open-ms.sourceforge.net/schemas/Param_1_3.xsd" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
		<NODE name="PeakPicker" descriptions="Finds mass spectrometric peaks">
			<NODE name="1" descriptions="Instance '1' section for 'PeakPicker'">
				<ITEM name="in" value="sample.mzML" type="input-file" description="input profile data" tags="required" supported_formats="*.mzML"/>
				<ITEM name="out" value="picked.mzML" type="output-file" description="output peak file" tags="required" supported_formats="*.mzML"/>
				<ITEM name="force" value="false" type="string" description="overwrite tool-specific checks" tags="advanced" restrictions="true,false"/>
				<NODE name="algorithm" descriptions="Algorithm parameters">
					<ITEM name="signal_to_noise" value="1.5" type="double" description="minimal S/N" restrictions="0:"/>
					<ITEM name="spacing_difference" value="1.5" type="double" description="gap factor" tags="advanced" restrictions="0:+inf"/>
					<ITEMLIST name="ms_levels" type="int" description="MS levels to pick" restrictions="1:">
						<LISTITEM value="1"/>
						<LISTITEM value="2"/>
					</ITEMLIST>
					<ITEMLIST name="weights" type="double" description="per-level weights" restrictions="0:1">
						<LISTITEM value="0.25"/>
						<LISTITEM value="1"/>
					</ITEMLIST>
					<ITEMLIST name="enzymes" type="string" description="digestion enzymes" tags="advanced" restrictions="Trypsin,LysC">
						<LISTITEM value="LysC"/>
					</ITEMLIST>
					<ITEMLIST name="spectra" type="input-file" description="extra spectra" supported_formats="*.mzML,*.mzXML">
						<LISTITEM value="a.mzML"/>
						<LISTITEM value="b.mzML"/>
					</ITEMLIST>
					<ITEMLIST name="adducts" type="string" description="adduct list"/>
					<ITEM name="method" value="fast" type="string" description="picking method" tags="required" restrictions="fast,exact"/>
				</NODE>
				<ITEM name="log" value="" type="string" description="log file name"/>
			</NODE>
		</NODE>
		<NODE name="FileFilter" descriptions="">
			<NODE name="1" descriptions="">
				<NODE name="empty" descriptions="nothing here"/>
				<ITEM name="mz" value=":" type="string" description="m/z range"/>
			</NODE>
		</NODE>
	</PARAMETERS>
</tool>
"#;

fn reparse(config: &NodeConfiguration) -> NodeConfiguration {
    let written = xml::write_config_string(config).expect("write");
    xml::read_config_str(&written).expect("re-read written document")
}

#[test]
fn round_trip_preserves_model() {
    let original = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    let copy = reparse(&original);

    assert_eq!(copy.name, original.name);
    assert_eq!(copy.version, original.version);
    assert_eq!(copy.doc_url, original.doc_url);
    assert_eq!(copy.category, original.category);
    assert_eq!(copy.description, original.description);
    assert_eq!(copy.manual, original.manual);
    assert_eq!(copy.executable_name, original.executable_name);
    assert_eq!(copy.executable_path, None);

    let keys: Vec<&str> = original.parameter_keys().collect();
    assert_eq!(copy.parameter_keys().collect::<Vec<_>>(), keys);
    for key in &keys {
        assert_eq!(copy.parameter(key), original.parameter(key), "parameter {key}");
    }
    assert_eq!(
        copy.parameters().sections().collect::<Vec<_>>(),
        original.parameters().sections().collect::<Vec<_>>()
    );
    assert_eq!(
        copy.section_description("FileFilter.1.empty"),
        Some("nothing here")
    );
    assert_eq!(copy.cli_mapping(), original.cli_mapping());
    assert_eq!(copy.relocators(), original.relocators());
    assert_eq!(copy.citations(), original.citations());
}

#[test]
fn list_kinds_are_typed() {
    let config = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    match config.parameter("PeakPicker.1.algorithm.weights") {
        Some(Parameter::DoubleList(p)) => {
            assert_eq!(p.values(), Some(&[0.25, 1.0][..]));
            assert_eq!(p.bounds().upper(), Some(1.0));
        }
        other => panic!("unexpected parameter: {other:?}"),
    }
    match config.parameter("PeakPicker.1.algorithm.enzymes") {
        Some(Parameter::StringList(p)) => {
            assert_eq!(p.allowed(), ["Trypsin", "LysC"]);
            assert_eq!(p.values(), Some(&["LysC".to_string()][..]));
            assert!(p.info.advanced);
        }
        other => panic!("unexpected parameter: {other:?}"),
    }
    match config.parameter("PeakPicker.1.algorithm.spectra") {
        Some(Parameter::FileList(p)) => {
            assert_eq!(p.formats, ["*.mzML", "*.mzXML"]);
            assert_eq!(p.values().map(<[String]>::len), Some(2));
        }
        other => panic!("unexpected parameter: {other:?}"),
    }
    let adducts = config
        .parameter("PeakPicker.1.algorithm.adducts")
        .expect("empty list");
    assert!(adducts.is_list());
    assert!(!adducts.has_value());

    let written = xml::write_config_string(&config).expect("write");
    assert!(written.contains(
        r#"<ITEMLIST name="weights" type="double" description="per-level weights" restrictions="0:1">"#
    ));
    assert!(written.contains(
        r#"<ITEMLIST name="enzymes" type="string" description="digestion enzymes" tags="advanced" restrictions="Trypsin,LysC">"#
    ));
    assert!(written.contains(
        r#"<ITEMLIST name="spectra" type="input-file" description="extra spectra" supported_formats="*.mzML,*.mzXML">"#
    ));
    assert!(written.contains(r#"<ITEMLIST name="adducts" type="string" description="adduct list"/>"#));
}

#[test]
fn writing_is_stable() {
    let first = xml::write_config_string(&xml::read_config_str(DESCRIPTOR).expect("parse"))
        .expect("write");
    let second =
        xml::write_config_string(&xml::read_config_str(&first).expect("re-parse")).expect("write");
    assert_eq!(first, second);
}

#[test]
fn item_line_is_reproduced() {
    let config = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    match config.parameter("FileFilter.1.mz") {
        Some(Parameter::String(p)) => {
            assert_eq!(p.value(), Some(":"));
            assert_eq!(p.info.description, "m/z range");
        }
        other => panic!("unexpected parameter: {other:?}"),
    }
    let written = xml::write_config_string(&config).expect("write");
    assert!(written.contains(r#"<ITEM name="mz" value=":" type="string" description="m/z range"/>"#));
    assert!(written.contains(
        r#"<ITEM name="signal_to_noise" value="1.5" type="double" description="minimal S/N" restrictions="0:+inf"/>"#
    ));
    assert!(written.contains(
        r#"<ITEM name="force" value="false" type="string" description="overwrite tool-specific checks" tags="advanced" restrictions="true,false"/>"#
    ));
}

#[test]
fn nested_sections_close_before_sibling_items() {
    let config = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    let written = xml::write_config_string(&config).expect("write");
    let algorithm = written.find(r#"<NODE name="algorithm""#).expect("algorithm node");
    let log = written.find(r#"<ITEM name="log""#).expect("log item");
    let close = written[algorithm..log].matches("</NODE>").count();
    assert_eq!(close, 1);
    assert_eq!(written.matches("<NODE ").count(), 6);
    assert_eq!(written.matches("</NODE>").count(), 5);
    assert!(written.contains(r#"<NODE name="empty" descriptions="nothing here"/>"#));
}

#[test]
fn mutated_values_survive_the_round_trip() {
    let mut config = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    config
        .parameters_mut()
        .fill_from_str("PeakPicker.1.algorithm.signal_to_noise", "3.25")
        .expect("in range");
    let err = config
        .parameters_mut()
        .fill_from_str("PeakPicker.1.algorithm.signal_to_noise", "-1")
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidValue { .. }));
    config
        .parameters_mut()
        .fill_from_str("PeakPicker.1.algorithm.method", "exact")
        .expect("member");

    let copy = reparse(&config);
    assert_eq!(
        copy.parameter("PeakPicker.1.algorithm.signal_to_noise")
            .map(Parameter::string_representation)
            .as_deref(),
        Some("3.25")
    );
    assert_eq!(
        copy.parameter("PeakPicker.1.algorithm.method")
            .map(Parameter::string_representation)
            .as_deref(),
        Some("exact")
    );
}

#[test]
fn arguments_and_relocation_use_parsed_mapping() {
    let config = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    config.validate().expect("references resolve");
    assert_eq!(
        config.build_arguments().expect("arguments"),
        vec![
            "-in",
            "sample.mzML",
            "-out",
            "picked.mzML",
            "-ms_levels",
            "1",
            "2",
            "-signal_to_noise",
            "1.5",
        ]
    );

    let work = tempfile::tempdir().expect("tempdir");
    std::fs::write(work.path().join("sample_picked.mzML"), b"<mzML/>").expect("tool output");
    let moved = config
        .relocate_outputs(&RelocationContext::new(work.path()))
        .expect("relocate");
    assert_eq!(moved, vec![work.path().join("picked.mzML")]);
    assert!(work.path().join("picked.mzML").exists());

    match config.relocate_outputs(&RelocationContext::new(work.path())) {
        Err(ModelError::RelocationFailed { path }) => {
            assert_eq!(path, work.path().join("sample_picked.mzML"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("PeakPicker.ctd");
    let config = xml::read_config_str(DESCRIPTOR).expect("parse descriptor");
    xml::write_config_file(&config, &path).expect("write file");
    let back = xml::read_config_file(&path).expect("read file");
    assert_eq!(back.parameter_keys().count(), config.parameter_keys().count());

    match xml::read_config_file(dir.path().join("absent.ctd")) {
        Err(XmlError::Io(_)) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}
