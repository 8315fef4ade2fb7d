use std::fs;
use std::path::PathBuf;

use sprig_bundler::{
    BundleCapability, CompileOptions, Error, Mode, OutputKind, PackageNamespace, RolldownBundler,
};
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (path, contents) in files {
        let full = temp.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }
    temp
}

#[tokio::test]
async fn test_transform_rewrites_bare_imports_and_keeps_relative() {
    let temp = project(&[
        (
            "src/main.js",
            "import React from 'react';\nimport { greet } from './greet';\nconsole.log(React, greet(process.env.NODE_ENV));\n",
        ),
        ("src/greet.js", "export const greet = (n) => `hi ${n}`;\n"),
    ]);

    let bundler = RolldownBundler::new(temp.path());
    let output = bundler
        .transform(
            &temp.path().join("src/main.js"),
            &CompileOptions::new(Mode::Development),
        )
        .await
        .unwrap();

    let code = output.contents_lossy();
    assert_eq!(output.kind(), OutputKind::Script);
    assert!(code.contains("/web_modules/react.js"), "code: {code}");
    assert!(code.contains("greet.js"), "code: {code}");
    assert!(!code.contains("hi ${n}"), "relative import was inlined: {code}");
    assert!(code.contains("\"development\""), "code: {code}");
}

#[tokio::test]
async fn test_transform_uses_custom_namespace() {
    let temp = project(&[("src/main.js", "import x from 'lodash';\nconsole.log(x);\n")]);

    let bundler =
        RolldownBundler::new(temp.path()).with_namespace(PackageNamespace::new("deps"));
    let output = bundler
        .transform(&PathBuf::from("src/main.js"), &CompileOptions::default())
        .await
        .unwrap();

    assert!(output.contents_lossy().contains("/deps/lodash.js"));
}

#[tokio::test]
async fn test_bundle_inlines_relative_imports() {
    let temp = project(&[
        (
            "src/main.js",
            "import { value } from './value.js';\nconsole.log(value, process.env.NODE_ENV);\n",
        ),
        ("src/value.js", "export const value = 'inlined-marker';\n"),
    ]);

    let bundler = RolldownBundler::new(temp.path());
    let outputs = bundler
        .bundle(
            &[temp.path().join("src/main.js")],
            &CompileOptions::new(Mode::Production),
        )
        .await
        .unwrap();

    let script = outputs
        .iter()
        .find(|f| f.kind() == OutputKind::Script)
        .expect("script output");
    let code = script.contents_lossy();
    assert!(code.contains("inlined-marker"), "code: {code}");
    assert!(code.contains("\"production\""), "code: {code}");
    assert!(!code.contains("process.env.NODE_ENV"), "code: {code}");
}

#[tokio::test]
async fn test_bundle_reports_unresolved_import() {
    let temp = project(&[("src/main.js", "import './does-not-exist.js';\n")]);

    let bundler = RolldownBundler::new(temp.path());
    let err = bundler
        .bundle(&[temp.path().join("src/main.js")], &CompileOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Bundle(_)));
    assert!(!err.messages().is_empty());
}

#[tokio::test]
async fn test_transform_leaves_strings_and_comments_alone() {
    let temp = project(&[(
        "src/main.js",
        "console.log(\"set process.env.NODE_ENV to enable\"); // process.env.NODE_ENV\nconsole.log(process.env.NODE_ENV);\n",
    )]);

    let output = RolldownBundler::new(temp.path())
        .transform(
            &temp.path().join("src/main.js"),
            &CompileOptions::new(Mode::Production),
        )
        .await
        .unwrap();

    let code = output.contents_lossy();
    assert!(code.contains("set process.env.NODE_ENV to enable"), "code: {code}");
    assert!(code.contains("\"production\""), "code: {code}");
    assert!(!code.contains("\"set \"production\""), "code: {code}");
}

#[tokio::test]
async fn test_bundle_package_inlines_entry_and_externalizes_dependencies() {
    let temp = project(&[
        (
            "node_modules/foo/package.json",
            r#"{ "name": "foo", "type": "module", "main": "index.js" }"#,
        ),
        (
            "node_modules/foo/index.js",
            "import bar from 'bar';\nexport default 'foo-marker:' + bar;\n",
        ),
        (
            "node_modules/bar/package.json",
            r#"{ "name": "bar", "type": "module", "main": "index.js" }"#,
        ),
        ("node_modules/bar/index.js", "export default 'bar-marker';\n"),
    ]);

    let outputs = RolldownBundler::new(temp.path())
        .bundle_package("foo", &CompileOptions::default())
        .await
        .unwrap();

    assert_eq!(outputs.len(), 1, "outputs: {outputs:?}");
    let code = outputs[0].contents_lossy();
    assert_eq!(outputs[0].kind(), OutputKind::Script);
    assert!(code.contains("foo-marker:"), "entry package not bundled: {code}");
    assert!(code.contains("/web_modules/bar.js"), "code: {code}");
    assert!(!code.contains("bar-marker"), "dependency was inlined: {code}");
}

#[tokio::test]
async fn test_bundle_stylesheet_entry_yields_only_css() {
    let temp = project(&[("src/style.css", "body { color: rebeccapurple; }\n")]);

    let outputs = RolldownBundler::new(temp.path())
        .bundle(&[temp.path().join("src/style.css")], &CompileOptions::default())
        .await
        .unwrap();

    assert_eq!(outputs.len(), 1, "outputs: {outputs:?}");
    assert_eq!(outputs[0].kind(), OutputKind::Stylesheet);
    assert_eq!(outputs[0].path, PathBuf::from("style.css"));
    assert!(outputs[0].contents_lossy().contains("rebeccapurple"));
}
