use policy_writer::{
    policy, to_policy, to_string, to_string_with_options, to_writer, Error, PafOptions, PafWriter,
    Policy, PolicyFile, PolicyWriter, Value, PAF_DECLARATION,
};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize, Debug, PartialEq)]
struct Amplifier {
    id: u32,
    gain: f64,
    bad_columns: Vec<i32>,
}

#[derive(Serialize, Debug, PartialEq)]
struct Camera {
    name: String,
    active: bool,
    binning: u8,
    filters: Vec<String>,
    amplifiers: Vec<Amplifier>,
    comment: Option<String>,
}

fn camera() -> Camera {
    Camera {
        name: "lsstcam".to_string(),
        active: true,
        binning: 2,
        filters: vec!["g".to_string(), "r".to_string()],
        amplifiers: vec![
            Amplifier {
                id: 0,
                gain: 1.0,
                bad_columns: vec![12, 40],
            },
            Amplifier {
                id: 1,
                gain: 1.25,
                bad_columns: vec![7],
            },
        ],
        comment: None,
    }
}

#[test]
fn test_struct_to_paf() {
    let policy = to_policy(&camera()).unwrap();
    let paf = to_string(&policy, true).unwrap();
    println!("Camera PAF:\n{}", paf);

    let expected = "\
#<?cfg paf policy ?>
name: \"lsstcam\"
active: true
binning: 2
filters: \"g\" \"r\"
amplifiers: {
  id: 0
  gain: 1.0
  bad_columns: 12 40
}
amplifiers: {
  id: 1
  gain: 1.25
  bad_columns: 7
}
";
    assert_eq!(paf, expected);
}

#[test]
fn test_none_fields_are_omitted() {
    let policy = to_policy(&camera()).unwrap();
    assert!(!policy.contains("comment"));
    assert_eq!(
        policy.names(true),
        vec!["name", "active", "binning", "filters", "amplifiers"]
    );
}

#[test]
fn test_scenario_single_int() {
    let mut policy = Policy::new();
    policy.set("x", 5).unwrap();

    let mut writer = PafWriter::new(Vec::new());
    writer.write(&policy, true).unwrap();
    let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();

    assert_eq!(paf, format!("{PAF_DECLARATION}\nx: 5\n"));
}

#[test]
fn test_scenario_nested_policy() {
    let policy = policy!({ "g": { "flag": true } }).unwrap();
    assert_eq!(to_string(&policy, false).unwrap(), "g: {\n  flag: true\n}\n");
}

#[test]
fn test_double_stays_distinguishable_from_int() {
    let policy = policy!({ "i": 2, "d": 2.0, "big": 1e21, "small": 1e-7 }).unwrap();
    let paf = to_string(&policy, false).unwrap();
    let lines: Vec<&str> = paf.lines().collect();

    assert_eq!(lines[0], "i: 2");
    assert_eq!(lines[1], "d: 2.0");
    for line in &lines[1..] {
        let value = line.split_once(": ").unwrap().1;
        assert!(
            value.contains('.') || value.contains('e'),
            "double written as integer: {line}"
        );
    }
}

#[test]
fn test_special_doubles() {
    let policy = policy!({ "v": [(f64::NAN), (f64::INFINITY), (f64::NEG_INFINITY)] }).unwrap();
    assert_eq!(to_string(&policy, false).unwrap(), "v: nan inf -inf\n");
}

#[test]
fn test_strings_are_escaped() {
    let policy = policy!({ "s": "a \"quoted\" path\\name" }).unwrap();
    assert_eq!(
        to_string(&policy, false).unwrap(),
        "s: \"a \\\"quoted\\\" path\\\\name\"\n"
    );
}

#[test]
fn test_file_references() {
    let mut policy = Policy::new();
    policy.set("defaults", PolicyFile::new("conf/base.paf")).unwrap();
    policy
        .set(
            "extras",
            vec![PolicyFile::new("a.paf"), PolicyFile::new("b.paf")],
        )
        .unwrap();

    assert_eq!(
        to_string(&policy, false).unwrap(),
        "defaults: @conf/base.paf\nextras: @a.paf @b.paf\n"
    );
}

#[test]
fn test_hierarchical_set_is_written_nested() {
    let mut policy = Policy::new();
    policy.set("isr.bias.enabled", true).unwrap();
    policy.set("isr.bias.level", 3).unwrap();
    policy.set("isr.flat", false).unwrap();

    let expected = "\
isr: {
  bias: {
    enabled: true
    level: 3
  }
  flat: false
}
";
    assert_eq!(to_string(&policy, false).unwrap(), expected);
}

#[test]
fn test_hierarchical_names_rejected_by_default() {
    let mut writer = PafWriter::new(Vec::new());
    let err = writer.write_string("a.b", "x").unwrap_err();
    assert!(matches!(err, Error::UnsupportedName { ref name } if name == "a.b"));
    assert!(writer.get_ref().unwrap().is_empty());
}

#[test]
fn test_hierarchical_names_kept_whole_when_enabled() {
    let options = PafOptions::new().with_hierarchical_names(true);
    let mut writer = PafWriter::with_options(Vec::new(), options);
    writer.write_ints("a.b.c", &[1, 2]).unwrap();
    writer.write_int("a.d", 4).unwrap();
    writer.write_int("top", 3).unwrap();

    let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(paf, "a.b.c: 1 2\na.d: 4\ntop: 3\n");
}

#[test]
fn test_dotted_keys_from_serde_render_as_one_block() {
    let map = BTreeMap::from([("isr.bias", 1), ("isr.flat", 2)]);
    let policy = to_policy(&map).unwrap();

    let shown = policy.to_string();
    assert_eq!(shown, "isr: {\n  bias: 1\n  flat: 2\n}\n");
    assert_eq!(shown, to_string(&policy, false).unwrap());
    assert_eq!(shown.matches("isr: {").count(), 1);
}

#[test]
fn test_file_reference_with_space_fails() {
    let mut policy = Policy::new();
    policy.set("defaults", PolicyFile::new("conf/my defaults.paf")).unwrap();
    assert!(matches!(to_string(&policy, false), Err(Error::Custom(_))));
}

#[test]
fn test_invalid_names() {
    let mut writer = PafWriter::new(Vec::new());
    for name in ["", "a..b", ".a", "a."] {
        let err = writer.write_int(name, 1).unwrap_err();
        assert!(
            matches!(err, Error::InvalidName { .. }),
            "expected invalid name for {name:?}, got {err:?}"
        );
    }
}

#[test]
fn test_compact_indent() {
    let policy = policy!({ "g": { "h": { "x": 1 } } }).unwrap();
    let paf = to_string_with_options(&policy, false, PafOptions::compact()).unwrap();
    assert_eq!(paf, "g: {\nh: {\nx: 1\n}\n}\n");

    let paf = to_string_with_options(&policy, false, PafOptions::new().with_indent(4)).unwrap();
    assert_eq!(paf, "g: {\n    h: {\n        x: 1\n    }\n}\n");
}

#[test]
fn test_empty_arrays_keep_their_name() {
    let mut writer = PafWriter::new(Vec::new());
    writer.write_strings("none", &[]).unwrap();
    writer.write_policies("blocks", &[]).unwrap();
    let paf = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(paf, "none:\nblocks:\n");
}

#[test]
fn test_to_writer_matches_to_string() {
    let policy = to_policy(&camera()).unwrap();
    let mut buffer = Vec::new();
    to_writer(&mut buffer, &policy, true).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), to_string(&policy, true).unwrap());
}

#[test]
fn test_display_matches_to_string() {
    let policy = to_policy(&camera()).unwrap();
    assert_eq!(policy.to_string(), to_string(&policy, false).unwrap());
}

#[test]
fn test_create_on_directory_fails() {
    let err = PafWriter::create(std::env::temp_dir()).unwrap_err();
    assert!(matches!(err, Error::Io(ref msg) if msg.starts_with("cannot open")));
}

#[test]
fn test_to_policy_maps_and_enums() {
    #[derive(Serialize)]
    enum Mode {
        Fast,
        Limited(u32),
    }

    let mut map = BTreeMap::new();
    map.insert("fast", Mode::Fast);
    map.insert("limited", Mode::Limited(4));

    let policy = to_policy(&map).unwrap();
    assert_eq!(policy.get("fast"), Some(&Value::from("Fast")));
    assert_eq!(policy.get("limited.Limited"), Some(&Value::from(4)));
}

#[test]
fn test_to_policy_sequence_rules() {
    #[derive(Serialize)]
    struct Lists {
        empty: Vec<i32>,
        mixed: Vec<Value>,
    }

    let err = to_policy(&Lists {
        empty: vec![],
        mixed: vec![Value::from(1), Value::from("two")],
    })
    .unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { ref name, .. } if name == "mixed"));

    let policy = to_policy(&Lists {
        empty: vec![],
        mixed: vec![Value::from(1), Value::from(2)],
    })
    .unwrap();
    assert_eq!(policy.names(true), vec!["mixed"]);

    let err = to_policy(&BTreeMap::from([(1, "non-string key")])).unwrap_err();
    assert!(err.to_string().contains("key"));
}

#[test]
fn test_policy_editing_then_writing() {
    let mut policy = policy!({ "ids": [1, 2], "gone": "x" }).unwrap();
    policy.add("ids", 3).unwrap();
    assert!(policy.remove("gone").is_some());
    policy.set("ids", vec![9]).unwrap();

    assert_eq!(to_string(&policy, false).unwrap(), "ids: 9\n");
}
