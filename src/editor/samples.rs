//! Example scripts cycled into the editor by the sample shortcut.

pub const SAMPLES: &[&str] = &[BASICS, STATISTICS];

const BASICS: &str = r#"// Rhai basics
print("Hello from the playground!");
print(text::repeat("=", 30));

let name = "Rhai";
let numbers = [1, 2, 3, 4, 5];
print(`Language: ${name}`);
print(`Numbers:  ${numbers}`);

let squares = numbers.map(|x| x * x);
print(`Squares:  ${squares}`);

fn fib(n) {
    if n <= 1 { n } else { fib(n - 1) + fib(n - 2) }
}

print("");
print("Fibonacci:");
for i in 0..8 {
    print(`  fib(${i}) = ${fib(i)}`);
}
"#;

const STATISTICS: &str = r#"// The preloaded math library
let data = [2, 4, 4, 4, 5, 5, 7, 9];

print(`data   = ${data}`);
print(`sum    = ${math::sum(data)}`);
print(`mean   = ${math::mean(data)}`);
print(`median = ${math::median(data)}`);
print(`stddev = ${math::round_to(math::stddev(data), 3)}`);
"#;
