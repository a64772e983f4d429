//! Integration tests for chat2docx document generation

use std::io::{Cursor, Read};

use chat2docx::{
    compile, generate_docx, markdown_to_document, AiSource, DocBlock, DocRun, GenerateError,
    GenerateOptions, MathNode, OUTPUT_FILE_NAME,
};

fn document_xml(bytes: &[u8]) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut xml)
        .unwrap();
    xml
}

// ============================================================================
// Math Compiler Properties
// ============================================================================

mod math_compiler {
    use super::*;

    #[test]
    fn test_termination_and_non_emptiness() {
        let inputs = [
            "",
            "   ",
            "x",
            r"\frac{a}{b}",
            r"\frac{a}{",
            "{{{}}}",
            "^_^",
            "ñandú 🦀",
            r"\left(\right",
            r"\unknown\commands\everywhere",
        ];
        for input in inputs {
            let nodes = compile(input);
            assert!(!nodes.is_empty(), "empty result for {:?}", input);
        }
    }

    #[test]
    fn test_garbage_falls_back_verbatim() {
        let garbage = "@#&~%";
        assert_eq!(
            compile(garbage),
            vec![MathNode::Run(garbage.to_string())]
        );
    }

    #[test]
    fn test_fraction_round_trip() {
        let nodes = compile(r"\frac{a}{b}");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            MathNode::Fraction {
                numerator,
                denominator,
            } => {
                assert_eq!(numerator, &vec![MathNode::Run("a".to_string())]);
                assert_eq!(denominator, &vec![MathNode::Run("b".to_string())]);
            }
            other => panic!("expected fraction, got {:?}", other),
        }
    }

    #[test]
    fn test_superscript_binds_previous_run() {
        let nodes = compile("m^2");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            MathNode::SuperScript { base, superscript } => {
                assert_eq!(base, &vec![MathNode::Run("m".to_string())]);
                assert_eq!(superscript, &vec![MathNode::Run("2".to_string())]);
            }
            other => panic!("expected superscript, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_braces_not_truncated() {
        let nodes = compile(r"\frac{a+{b}}{c}");
        match &nodes[0] {
            MathNode::Fraction { numerator, .. } => {
                let text: String = numerator
                    .iter()
                    .map(|n| match n {
                        MathNode::Run(t) => t.as_str(),
                        _ => "?",
                    })
                    .collect();
                assert_eq!(text, "a+{b}");
            }
            other => panic!("expected fraction, got {:?}", other),
        }
    }

    #[test]
    fn test_symbols_resolve() {
        assert_eq!(compile(r"\pm"), vec![MathNode::Run("±".to_string())]);
        assert_eq!(compile(r"\infty"), vec![MathNode::Run("∞".to_string())]);
        assert_eq!(compile(r"\alpha"), vec![MathNode::Run("α".to_string())]);
    }
}

// ============================================================================
// Classification and Assembly
// ============================================================================

mod assembly {
    use super::*;

    #[test]
    fn test_display_paragraph_promotion() {
        let doc =
            markdown_to_document("$E=mc^2$\n", &GenerateOptions::default()).unwrap();
        assert_eq!(doc.blocks.len(), 1);
        match &doc.blocks[0] {
            DocBlock::Paragraph(p) => {
                assert_eq!(p.props.justify, Some(chat2docx::docx::Justify::Center));
                assert!(matches!(p.children[0], DocRun::Math(_)));
            }
            other => panic!("expected centered equation paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_table_header_styling() {
        let doc = markdown_to_document(
            "| a | b |\n|---|---|\n| 1 | 2 |\n",
            &GenerateOptions::default(),
        )
        .unwrap();
        match &doc.blocks[0] {
            DocBlock::Table(table) => {
                assert_eq!(table.rows.len(), 2);
                for cell in &table.rows[0].cells {
                    match &cell.content.children[0] {
                        DocRun::Text(run) => assert!(run.bold, "header cell must be bold"),
                        other => panic!("expected text run, got {:?}", other),
                    }
                }
                for cell in &table.rows[1].cells {
                    match &cell.content.children[0] {
                        DocRun::Text(run) => assert!(!run.bold, "body cell must not be bold"),
                        other => panic!("expected text run, got {:?}", other),
                    }
                }
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_quadratic_formula() {
        let doc = markdown_to_document(
            "# T\n\n$$x=\\frac{-b\\pm\\sqrt{b^2-4ac}}{2a}$$\n",
            &GenerateOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.blocks.len(), 2);

        match &doc.blocks[0] {
            DocBlock::Paragraph(p) => {
                assert_eq!(p.props.heading, Some(1));
                match &p.children[0] {
                    DocRun::Text(run) => assert_eq!(run.text, "T"),
                    other => panic!("expected text run, got {:?}", other),
                }
            }
            other => panic!("expected heading paragraph, got {:?}", other),
        }

        match &doc.blocks[1] {
            DocBlock::Paragraph(p) => {
                assert_eq!(p.props.justify, Some(chat2docx::docx::Justify::Center));
                match &p.children[0] {
                    DocRun::Math(nodes) => {
                        assert_eq!(nodes[0], MathNode::Run("x".to_string()));
                        assert_eq!(nodes[1], MathNode::Run("=".to_string()));
                        match &nodes[2] {
                            MathNode::Fraction { numerator, .. } => {
                                assert!(numerator
                                    .iter()
                                    .any(|n| *n == MathNode::Run("±".to_string())));
                                assert!(numerator
                                    .iter()
                                    .any(|n| matches!(n, MathNode::Radical { .. })));
                            }
                            other => panic!("expected fraction, got {:?}", other),
                        }
                    }
                    other => panic!("expected math run, got {:?}", other),
                }
            }
            other => panic!("expected equation paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_list_with_interleaved_equation_stays_one_list() {
        let doc = markdown_to_document(
            "1. primero\n\n$$a+b$$\n\n2. segundo\n",
            &GenerateOptions::default(),
        )
        .unwrap();
        // marker paragraph, indented equation, marker paragraph
        let markers: Vec<String> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                DocBlock::Paragraph(p) => match p.children.first() {
                    Some(DocRun::Text(run)) if run.text.ends_with(". ") => {
                        Some(run.text.clone())
                    }
                    _ => None,
                },
                _ => None,
            })
            .collect();
        assert_eq!(markers, vec!["1. ".to_string(), "2. ".to_string()]);
    }
}

// ============================================================================
// Package Generation
// ============================================================================

mod package {
    use super::*;

    #[test]
    fn test_generated_package_is_valid_zip_with_equations() {
        let bytes = generate_docx(
            "# T\n\n$$x=\\frac{-b\\pm\\sqrt{b^2-4ac}}{2a}$$\n",
            &GenerateOptions::default(),
        )
        .unwrap();
        assert!(bytes.starts_with(b"PK"));

        let xml = document_xml(&bytes);
        assert!(xml.contains("<m:oMath>"));
        assert!(xml.contains("<m:f><m:num>"));
        assert!(xml.contains("±"));
        assert!(xml.contains("<w:pStyle w:val=\"Heading1\"/>"));
    }

    #[test]
    fn test_empty_document_fails_instead_of_empty_file() {
        let err = generate_docx("\n   \n", &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, GenerateError::EmptyDocument));
    }

    #[test]
    fn test_output_file_name_constant() {
        assert_eq!(OUTPUT_FILE_NAME, "documento.docx");
    }

    #[test]
    fn test_chatgpt_bracket_math_end_to_end() {
        let options = GenerateOptions {
            source: AiSource::ChatGpt,
            csv_tables: false,
        };
        let bytes = generate_docx(
            "La proporción es:\n[\n\\frac{4500}{3} = \\frac{x}{7}\n]\nlisto.\n",
            &options,
        )
        .unwrap();
        let xml = document_xml(&bytes);
        assert!(xml.contains("<m:f><m:num>"));
        assert!(xml.contains("4500"));
    }

    #[test]
    fn test_csv_table_flag_end_to_end() {
        let options = GenerateOptions {
            source: AiSource::Gemini,
            csv_tables: true,
        };
        let bytes = generate_docx("nombre, edad\nana, 30\nluis, 28\n", &options).unwrap();
        let xml = document_xml(&bytes);
        assert!(xml.contains("<w:tbl>"));
        assert!(xml.contains("nombre"));
    }
}

// ============================================================================
// Preprocessor Properties
// ============================================================================

mod preprocessing {
    use chat2docx::preprocess::{preprocess, preprocess_lists, AiSource};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_preprocessor_idempotent() {
        let input = "13. item\n    - sub\n1. next\n\n* bullet\n";
        let once = preprocess_lists(input);
        let twice = preprocess_lists(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_full_pipeline_idempotent_both_sources() {
        let input =
            "# T\n\n1. a\n    - s\n1. b\ntext\n$$x^2$$\n\n| a | b |\n\n|---|---|\n| 1 | 2 |\n";
        for source in [AiSource::Gemini, AiSource::ChatGpt] {
            let once = preprocess(input, source, true);
            let twice = preprocess(&once, source, true);
            assert_eq!(once, twice, "pipeline not idempotent for {:?}", source);
        }
    }
}
