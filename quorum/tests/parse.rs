use quorum::{Alias, Combinator, Const, Constraint, Markers, ParseError, Parser, Switch, Unknown, Value};

#[test]
fn fresh_arguments_are_unset() {
    let mut parser = Parser::new("test");
    let flag = parser.add(Switch::new().short('a'));
    let value = parser.add(Value::<String>::new().long("name"));

    assert_eq!(parser.count(flag), 0);
    assert!(!parser.is_set(flag));
    assert_eq!(parser.count(value), 0);
    assert_eq!(parser.value(value), None);
}

#[test]
fn counts_grow_by_one_per_occurrence() {
    let mut parser = Parser::new("test");
    let verbose = parser.add(Switch::new().short('v').unbounded());

    parser.parse(["-v", "-vv", "-v"]).unwrap();
    assert_eq!(parser.count(verbose), 4);
}

#[test]
fn over_count_is_reported_not_unknown() {
    let mut parser = Parser::new("test");
    let a = parser.add(Switch::new().short('a').max(2));

    assert_eq!(
        parser.parse(["-aaa"]),
        Err(ParseError::CountMismatch {
            argument: "-a".to_owned(),
            count: 3,
            min: 1,
            max: 2,
        })
    );
    assert!(!parser.spec(a).can_accept());
}

#[test]
fn flag_cluster_sets_each_flag_once() {
    let mut parser = Parser::new("test");
    let a = parser.add(Switch::new().short('a'));
    let b = parser.add(Switch::new().short('b'));
    let c = parser.add(Switch::new().short('c'));

    parser.parse(["-abc"]).unwrap();

    for id in [a, b, c] {
        assert_eq!(parser.count(id), 1);
    }
}

#[test]
fn attached_short_value() {
    let mut parser = Parser::new("test");
    let o = parser.add(Value::<String>::new().short('o'));

    parser.parse(["-ovalue"]).unwrap();
    assert_eq!(parser.value(o).map(String::as_str), Some("value"));
}

#[test]
fn cluster_ending_in_a_value_flag_takes_the_next_token() {
    let mut parser = Parser::new("test");
    let x = parser.add(Switch::new().short('x'));
    let o = parser.add(Value::<u32>::new().short('o'));

    parser.parse(["-xo", "12"]).unwrap();
    assert!(parser.is_set(x));
    assert_eq!(parser.value(o), Some(&12));
}

#[test]
fn delimited_name() {
    let mut parser = Parser::new("test");
    let name = parser.add(Value::<String>::new().long("name"));

    parser.parse(["--name=value"]).unwrap();
    assert_eq!(parser.value(name).map(String::as_str), Some("value"));
}

#[test]
fn delimited_value_for_a_switch() {
    let mut parser = Parser::new("test");
    parser.add(Switch::new().long("name"));

    assert_eq!(
        parser.parse(["--name=value"]),
        Err(ParseError::NoValue {
            argument: "--name".to_owned(),
            value: "value".to_owned(),
        })
    );
}

#[test]
fn name_takes_the_next_token_verbatim() {
    let mut parser = Parser::new("test");
    let name = parser.add(Value::<String>::new().long("name"));

    parser.parse(["--name", "--"]).unwrap();
    assert_eq!(parser.value(name).map(String::as_str), Some("--"));
}

#[test]
fn missing_value_at_end_of_input() {
    let mut parser = Parser::new("test");
    parser.add(Value::<String>::new().short('o').long("output"));

    assert_eq!(
        parser.parse(["-o"]),
        Err(ParseError::MissingValue {
            argument: "-o".to_owned()
        })
    );
}

#[test]
fn stop_marker_makes_the_rest_positional() {
    let mut parser = Parser::new("test");
    let a = parser.add(Switch::new().short('a'));
    let rest = parser.add(Value::<String>::new().placeholder("REST").unbounded());

    parser.parse(["-a", "--", "-b", "--"]).unwrap();

    assert!(parser.is_set(a));
    assert_eq!(parser.values(rest), ["-b", "--"]);
}

#[test]
fn positionals_fill_in_declaration_order() {
    let mut parser = Parser::new("test");
    let first = parser.add(Value::<String>::new().placeholder("FIRST").max(1));
    let rest = parser.add(Value::<String>::new().placeholder("REST").unbounded());

    parser.parse(["w", "x", "y", "z"]).unwrap();

    assert_eq!(parser.values(first), ["w"]);
    assert_eq!(parser.values(rest), ["x", "y", "z"]);
}

#[test]
fn extra_positional_is_an_over_count() {
    let mut parser = Parser::new("test");
    parser.add(Value::<String>::new().placeholder("FILE"));

    assert!(matches!(
        parser.parse(["a", "b"]),
        Err(ParseError::CountMismatch { ref argument, count: 2, .. }) if argument == "FILE"
    ));
}

#[test]
fn unknown_arguments() {
    let cases: [(&[&str], Unknown); 3] = [
        (&["-z"], Unknown::Flag { prefix: "-", flag: 'z' }),
        (&["--zed=1"], Unknown::Name { prefix: "--", name: "zed".to_owned() }),
        (&["stray"], Unknown::Positional("stray".to_owned())),
    ];

    for (tokens, unknown) in cases {
        let mut parser = Parser::new("test");
        parser.add(Switch::new().short('a'));

        assert_eq!(parser.parse(tokens), Err(ParseError::UnknownArgument(unknown)));
    }
}

#[test]
fn invalid_values_are_not_counted() {
    let mut parser = Parser::new("test");
    let jobs = parser.add(Value::<u8>::new().short('j').long("jobs"));

    let error = parser.parse(["--jobs", "many"]).unwrap_err();

    assert_eq!(error.argument(), Some("-j"));
    assert!(error.to_string().starts_with("invalid value \"many\" for -j: "));
    assert_eq!(parser.count(jobs), 0);
}

#[test]
fn custom_parse_function() {
    let mut parser = Parser::new("test");
    let level = parser.add(
        Value::with_parser(|raw: &str| match raw {
            "low" => Ok(1u8),
            "high" => Ok(9u8),
            _ => Err(format!("unknown level {raw}")),
        })
        .long("level"),
    );

    parser.parse(["--level", "high"]).unwrap();
    assert_eq!(parser.value(level), Some(&9));
}

#[test]
fn single_values_overwrite_and_repeated_values_collect() {
    let mut parser = Parser::new("test");
    let mode = parser.add(Value::<String>::new().long("mode"));
    let include = parser.add(Value::<String>::new().short('I').unbounded());

    parser.parse(["-Ia", "-I", "b", "--mode=fast"]).unwrap();

    assert_eq!(parser.values(include), ["a", "b"]);
    assert_eq!(parser.values(mode), ["fast"]);
}

#[test]
fn min_applies_only_when_present() {
    let mut parser = Parser::new("test");
    parser.add(Value::<String>::new().short('k').min(2).max(3));

    parser.parse(Vec::<String>::new()).unwrap();

    let mut parser = Parser::new("test");
    parser.add(Value::<String>::new().short('k').min(2).max(3));

    assert_eq!(
        parser.parse(["-k", "a"]).unwrap_err().to_string(),
        "-k must appear at least 2 times (got 1)"
    );
}

#[test]
fn required_arguments() {
    let mut parser = Parser::new("test");
    parser.add(Value::<String>::new().long("output").required());

    assert_eq!(
        parser.parse(["--"]).unwrap_err().to_string(),
        "required argument --output was omitted"
    );
}

#[test]
fn aliases_added_later_still_match() {
    let mut parser = Parser::new("test");
    let input = parser.add(Value::<String>::new().placeholder("INPUT").unbounded());
    parser.add_alias(input, Alias::Name("input".to_owned()));
    parser.add_alias(input, Alias::Flag('i'));

    parser.parse(["a", "--input=b", "-ic"]).unwrap();
    assert_eq!(parser.values(input), ["a", "b", "c"]);
}

#[test]
fn custom_markers() {
    let markers = Markers::new("/", "//", ":", ";;").unwrap();
    let mut parser = Parser::with_markers("test", markers);
    let verbose = parser.add(Switch::new().short('v'));
    let out = parser.add(Value::<String>::new().long("out"));
    let rest = parser.add(Value::<String>::new().unbounded());

    parser.parse(["/v", "//out:x", "-v", ";;", "/v"]).unwrap();

    assert!(parser.is_set(verbose));
    assert_eq!(parser.value(out).map(String::as_str), Some("x"));
    assert_eq!(parser.values(rest), ["-v", "/v"]);

    let error = parser.parse(["/q"]).unwrap_err();
    assert_eq!(error.to_string(), "unrecognized option /q");
}

#[test]
fn check_callbacks_reject_occurrences() {
    let mut parser = Parser::new("test");
    let port = parser.add(
        Value::<u16>::new()
            .long("port")
            .check(|raw| match raw.is_some_and(|raw| raw.starts_with('0')) {
                true => Err("no leading zeros".to_owned()),
                false => Ok(()),
            }),
    );

    assert_eq!(
        parser.parse(["--port=080"]).unwrap_err().to_string(),
        "invalid value \"080\" for --port: no leading zeros"
    );
    assert_eq!(parser.count(port), 0);
}

#[test]
fn constants_select_between_choices() {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Format {
        Json,
        Yaml,
    }

    let parser = || {
        let mut parser = Parser::new("test");
        let json = parser.add(Const::new(Format::Json).long("json"));
        let yaml = parser.add(Const::new(Format::Yaml).long("yaml"));
        parser.constrain(Constraint::exactly_one_of().arg(json).arg(yaml));
        (parser, json, yaml)
    };

    let (mut parsed, json, yaml) = parser();
    parsed.parse(["--yaml"]).unwrap();
    assert_eq!(parsed.value(json), None);
    assert_eq!(parsed.value(yaml), Some(&Format::Yaml));

    let (mut parsed, ..) = parser();
    assert!(matches!(
        parsed.parse(["--json", "--yaml"]),
        Err(ParseError::ConstraintViolation { kind: Combinator::ExactlyOneOf, .. })
    ));

    let (mut parsed, ..) = parser();
    assert_eq!(
        parsed.parse(["--json=yes"]),
        Err(ParseError::NoValue {
            argument: "--json".to_owned(),
            value: "yes".to_owned(),
        })
    );
}

#[test]
fn defaults_and_typed_checks() {
    let parser = || {
        let mut parser = Parser::new("test");
        let jobs = parser.add(
            Value::<u32>::new()
                .short('j')
                .default_value(1)
                .check_value(|jobs: &u32| match *jobs {
                    1..=64 => Ok(()),
                    _ => Err("expected 1 to 64 jobs"),
                }),
        );
        (parser, jobs)
    };

    let (mut parsed, jobs) = parser();
    parsed.parse(Vec::<&str>::new()).unwrap();
    assert_eq!(parsed.value(jobs), Some(&1));
    assert!(!parsed.is_set(jobs));

    let (mut parsed, jobs) = parser();
    parsed.parse(["-j8"]).unwrap();
    assert_eq!(parsed.value(jobs), Some(&8));

    let (mut parsed, _) = parser();
    assert_eq!(
        parsed.parse(["-j", "100"]),
        Err(ParseError::InvalidValue {
            argument: "-j".to_owned(),
            value: Some("100".to_owned()),
            message: "expected 1 to 64 jobs".to_owned(),
        })
    );
}
