use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jscope_parser::parse;

// A medium-size ES5 source (~80 lines) with various constructs
const SOURCE: &str = r#"
// Module pattern with a private registry
var Registry = (function () {
    var items = {};
    var count = 0;

    function register(name, factory) {
        if (typeof factory !== 'function') {
            throw new TypeError('factory must be a function: ' + name);
        }
        items[name] = { factory: factory, instance: null };
        count++;
    }

    function resolve(name) {
        var entry = items[name];
        if (!entry) {
            return undefined;
        }
        if (entry.instance === null) {
            entry.instance = entry.factory();
        }
        return entry.instance;
    }

    function names() {
        var result = [];
        for (var key in items) {
            if (items.hasOwnProperty(key)) {
                result.push(key);
            }
        }
        return result.sort();
    }

    return {
        register: register,
        resolve: resolve,
        names: names,
        get size() { return count; }
    };
})();

function parseRows(text) {
    var lines = text.split(/\r?\n/g);
    var rows = [];
    for (var i = 0; i < lines.length; i++) {
        var line = lines[i];
        if (line.length === 0 || line.charAt(0) === '#') {
            continue;
        }
        var cells = line.split(',');
        var row = [];
        for (var j = 0; j < cells.length; j++) {
            row.push(parseInt(cells[j], 10) || 0);
        }
        rows.push(row);
    }
    return rows;
}

function summarize(rows) {
    var total = 0, max = -Infinity;
    try {
        rows.forEach(function (row) {
            for (var k = 0; k < row.length; k++) {
                total += row[k];
                max = row[k] > max ? row[k] : max;
            }
        });
    } catch (err) {
        return { error: err.message };
    } finally {
        total = total | 0;
    }
    switch (rows.length) {
        case 0: return { empty: true };
        default: return { total: total, max: max };
    }
}
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_es5_medium", |b| {
        b.iter(|| {
            let result = parse(black_box(SOURCE));
            black_box(result.ast.len());
        });
    });
}

fn bench_parse_large(c: &mut Criterion) {
    let large_source = SOURCE.repeat(20);
    c.bench_function("parse_es5_large", |b| {
        b.iter(|| {
            let result = parse(black_box(&large_source));
            black_box(result.ast.len());
        });
    });
}

criterion_group!(benches, bench_parse, bench_parse_large);
criterion_main!(benches);
