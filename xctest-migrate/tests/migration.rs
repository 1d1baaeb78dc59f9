use std::fs;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use xctest_migrate::{migrate, MigrationError};

fn fixture(path: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path);
    fs::read_to_string(&path).unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
}

#[test]
fn calculator_fixture_matches_expected_output() {
    let migrated = migrate(&fixture("fixtures/calculator_tests.swift")).expect("migrate");
    assert_eq!(migrated, fixture("fixtures/calculator_tests.expected.swift"));
}

#[test]
fn trivial_suite() {
    let source = "import XCTest\n\nclass T: XCTestCase {\n    func test_Example() {\n        XCTAssertTrue(true)\n    }\n}\n";
    assert_eq!(
        migrate(source).unwrap(),
        "import Testing\n\nstruct T {\n    @Test\n    func example() {\n        #expect(true == true)\n    }\n}\n"
    );
}

#[test]
fn stateless_suite_becomes_a_struct_without_hooks() {
    let source = "import XCTest\n\nfinal class MathTests: XCTestCase {\n    func testOne() {\n        XCTAssertEqual(one, 1)\n    }\n\n    func testTwo() {\n        XCTAssertNil(nothing)\n    }\n}\n";
    let migrated = migrate(source).unwrap();
    assert!(migrated.contains("struct MathTests {"), "{migrated}");
    assert!(!migrated.contains("class"));
    assert!(!migrated.contains("init("));
    assert!(!migrated.contains("deinit"));
    assert!(migrated.contains("#expect(nothing == nil)"));
}

#[test]
fn stateful_suite_keeps_reference_semantics() {
    let source = "import XCTest\n\nfinal class StoreTests: XCTestCase {\n    var store: Store!\n\n    override func setUp() {\n        super.setUp()\n        store = Store()\n    }\n\n    override func tearDown() {\n        store = nil\n        super.tearDown()\n    }\n\n    func testSave() {\n        XCTAssertNotNil(store)\n    }\n}\n";
    assert_eq!(
        migrate(source).unwrap(),
        "import Testing\n\nfinal class StoreTests {\n    var store: Store!\n\n    init() {\n        store = Store()\n    }\n\n    deinit {\n        store = nil\n    }\n\n    @Test\n    func save() {\n        #expect(store != nil)\n    }\n}\n"
    );
}

#[test]
fn empty_string_comparison_in_either_order() {
    for call in ["XCTAssertEqual(s, \"\")", "XCTAssertEqual(\"\", s)"] {
        let source = format!("import XCTest\n\nfunc check() {{\n    {call}\n}}\n");
        let migrated = migrate(&source).unwrap();
        assert!(migrated.contains("#expect(s.isEmpty == true)"), "{migrated}");
    }
}

#[test]
fn import_groups_are_sorted_separately() {
    let source = "import XCTest\nimport Foundation\n\nimport Zoo\n@testable import App\n";
    assert_eq!(
        migrate(source).unwrap(),
        "import Foundation\nimport Testing\n\n@testable import App\nimport Zoo\n"
    );
}

#[test]
fn files_without_legacy_code_are_untouched() {
    let source = fixture("fixtures/plain.swift");
    assert_eq!(migrate(&source).unwrap(), source);
}

#[test]
fn migrated_output_is_stable() {
    let once = migrate(&fixture("fixtures/calculator_tests.swift")).unwrap();
    assert_eq!(migrate(&once).unwrap(), once);
}

#[test]
fn unrelated_declarations_keep_their_bytes() {
    let helper = "/// Shared fixture data.\nenum Samples {\n    static let  numbers = [1, 2, 3]   // spacing kept\n\n    static func make() -> [Int] { numbers }\n}\n";
    let source = format!(
        "import XCTest\n\n{helper}\nfinal class SampleTests: XCTestCase {{\n    func testCount() {{\n        XCTAssertEqual(Samples.numbers.count, 3)\n    }}\n}}\n"
    );
    let migrated = migrate(&source).unwrap();
    assert!(migrated.contains(&format!("\n\n{helper}\n")), "{migrated}");
}

#[test]
fn expectations_reject_the_whole_file() {
    let source = fixture("fixtures/expectation_tests.swift");
    match migrate(&source) {
        Err(MigrationError::UnsupportedPattern(reason)) => {
            assert!(reason.contains("expectations"), "{reason}");
        }
        other => panic!("expected UnsupportedPattern, got {other:?}"),
    }
}

#[test]
fn broken_legacy_file_is_invalid_syntax() {
    let source = "import XCTest\n\nclass BrokenTests: XCTestCase {\n    func testOne() {\n";
    assert!(matches!(
        migrate(source),
        Err(MigrationError::InvalidSyntax(_))
    ));
}

#[test]
fn optional_subscript_spacing_is_fixed() {
    let source = "import XCTest\n\nfunc check() {\n    XCTAssertEqual(dict? [\"key\"], 1)\n}\n";
    let migrated = migrate(source).unwrap();
    assert!(migrated.contains("#expect(dict?[\"key\"] == 1)"), "{migrated}");
}

#[test]
fn crlf_line_endings_are_kept() {
    let source = "import XCTest\r\n\r\nfinal class A: XCTestCase {\r\n    func testOne() {\r\n        XCTAssertTrue(flag)\r\n    }\r\n}\r\n";
    assert_eq!(
        migrate(source).unwrap(),
        "import Testing\r\n\r\nstruct A {\r\n    @Test\r\n    func one() {\r\n        #expect(flag == true)\r\n    }\r\n}\r\n"
    );
}
