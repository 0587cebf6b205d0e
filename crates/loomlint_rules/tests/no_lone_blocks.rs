//! Fixture corpus for no-lone-blocks.

use std::sync::Arc;

use loomlint_core::{LanguageOptions, NodeType};
use loomlint_rules::NoLoneBlocks;
use loomlint_tester::{ExpectedError, InvalidCase, RuleTester, TestCases, ValidCase};

fn tester() -> RuleTester {
    RuleTester::new().ecma(5)
}

fn redundant() -> ExpectedError {
    ExpectedError::message_id("redundantBlock").node_type(NodeType::BlockStatement)
}

fn nested() -> ExpectedError {
    ExpectedError::message_id("redundantNestedBlock").node_type(NodeType::BlockStatement)
}

#[test]
fn valid() {
    let cases = TestCases::new()
        .valid([
            "if (foo) { if (bar) { baz(); } }",
            "do { bar(); } while (foo)",
            "function foo() { while (bar) { baz() } }",
        ])
        .valid([
            ValidCase::new("{ let x = 1; }").ecma(6),
            ValidCase::new("{ const x = 1; }").ecma(6),
            ValidCase::new("'use strict'; { function bar() {} }").ecma(6),
            ValidCase::new("{ function bar() {} }")
                .with_language(LanguageOptions::new(6).implied_strict()),
            ValidCase::new("{ class Bar {} }").ecma(6),
            ValidCase::new("{ {let y = 1;} let x = 1; }").ecma(6),
        ])
        .valid([
            "
          switch (foo) {
            case bar: {
              baz;
            }
          }
        ",
            "
          switch (foo) {
            case bar: {
              baz;
            }
            case qux: {
              boop;
            }
          }
        ",
            "
          switch (foo) {
            case bar:
            {
              baz;
            }
          }
        ",
        ])
        .valid([
            ValidCase::new("function foo() { { const x = 4 } const x = 3 }").ecma(6),
            ValidCase::new("class C { static {} }").ecma(2022),
            ValidCase::new("class C { static { foo; } }").ecma(2022),
            ValidCase::new("class C { static { if (foo) { block; } } }").ecma(2022),
            ValidCase::new("class C { static { lbl: { block; } } }").ecma(2022),
            ValidCase::new("class C { static { { let block; } something; } }").ecma(2022),
            ValidCase::new("class C { static { something; { const block = 1; } } }").ecma(2022),
            ValidCase::new("class C { static { { function block(){} } something; } }").ecma(2022),
            ValidCase::new("class C { static { something; { class block {}  } } }").ecma(2022),
        ]);

    tester().run(Arc::new(NoLoneBlocks::new()), &cases);
}

#[test]
fn invalid_es5() {
    let cases = TestCases::new().invalid([
        InvalidCase::new("{}").error(redundant()),
        InvalidCase::new("{var x = 1;}").error(redundant()),
        InvalidCase::new("foo(); {} bar();").error(redundant()),
        InvalidCase::new("if (foo) { bar(); {} baz(); }").error(nested()),
        InvalidCase::new("{ \n{ } }")
            .error(redundant().line(1))
            .error(nested().line(2)),
        InvalidCase::new("function foo() { bar(); {} baz(); }").error(nested()),
        InvalidCase::new("while (foo) { {} }").error(nested()),
        InvalidCase::new(
            "
              switch (foo) {
                case 1:
                    foo();
                    {
                        bar;
                    }
              }
            ",
        )
        .error(redundant().line(5)),
        InvalidCase::new(
            "
              switch (foo) {
                case 1:
                {
                    bar;
                }
                foo();
              }
            ",
        )
        .error(redundant().line(4)),
        InvalidCase::new(
            "
              function foo () {
                {
                  var x = 4;
                }
              }
            ",
        )
        .error(nested().line(3)),
    ]);

    tester().run(Arc::new(NoLoneBlocks::new()), &cases);
}

#[test]
fn invalid_es2015() {
    let cases = TestCases::new().invalid([
        InvalidCase::new("{ function bar() {} }").ecma(6).error(redundant()),
        InvalidCase::new("{var x = 1;}").ecma(6).error(redundant()),
        InvalidCase::new("{ \n{var x = 1;}\n let y = 2; } {let z = 1;}")
            .ecma(6)
            .error(nested().line(2)),
        InvalidCase::new("{ \n{let x = 1;}\n var y = 2; } {let z = 1;}")
            .ecma(6)
            .error(redundant().line(1)),
        InvalidCase::new("{ \n{var x = 1;}\n var y = 2; }\n {var z = 1;}")
            .ecma(6)
            .error(redundant().line(1))
            .error(nested().line(2))
            .error(redundant().line(4)),
        InvalidCase::new(
            "
              function foo () {
                {
                  const x = 4;
                }
              }
            ",
        )
        .ecma(6)
        .error(nested().line(3)),
    ]);

    tester().run(Arc::new(NoLoneBlocks::new()), &cases);
}

#[test]
fn invalid_static_blocks() {
    let static_block = |code: &str, line: u32| {
        InvalidCase::new(code)
            .ecma(2022)
            .error(nested().line(line))
    };

    let cases = TestCases::new().invalid([
        static_block(
            "
              class C {
                static {
                  if (foo) {
                    {
                        let block;
                    }
                  }
                }
              }
            ",
            5,
        ),
        static_block(
            "
              class C {
                static {
                  if (foo) {
                    {
                        block;
                    }
                    something;
                  }
                }
              }
            ",
            5,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    block;
                  }
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    let block;
                  }
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    const block = 1;
                  }
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    function block() {}
                  }
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    class block {}
                  }
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    var block;
                  }
                  something;
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  something;
                  {
                    var block;
                  }
                }
              }
            ",
            5,
        ),
        static_block(
            "
              class C {
                static {
                  {
                    block;
                  }
                  something;
                }
              }
            ",
            4,
        ),
        static_block(
            "
              class C {
                static {
                  something;
                  {
                    block;
                  }
                }
              }
            ",
            5,
        ),
    ]);

    tester().run(Arc::new(NoLoneBlocks::new()), &cases);
}

#[test]
fn never_fixes() {
    let cases = TestCases::new().invalid([InvalidCase::new("{ foo(); }")
        .error(redundant())
        .no_output()]);

    tester().run(Arc::new(NoLoneBlocks::new()), &cases);
}
