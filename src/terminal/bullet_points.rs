use std::fmt::Display;

const INDENT_SIZE: usize = 2;
const BULLETS: [char; 2] = ['•', '◦'];

/// Prints nested bullet lists, one item per line.
pub struct BulletPointPrinter<W: LineWriter + Clone> {
    writer: W,
    nesting: usize,
}

impl<W: LineWriter + Clone> BulletPointPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, nesting: 0 }
    }

    pub fn print_item(&self, message: impl Display) {
        let indent = " ".repeat(self.nesting * INDENT_SIZE);
        let bullet = BULLETS[self.nesting % BULLETS.len()];
        self.writer.write_line(&format!("{}{} {}", indent, bullet, message));
    }

    /// Prints every item, or `placeholder` if there are none.
    pub fn print_items<T: Display>(&self, items: impl IntoIterator<Item = T>, placeholder: impl Display) {
        let mut empty = true;
        for item in items {
            self.print_item(item);
            empty = false;
        }
        if empty {
            self.print_item(placeholder);
        }
    }

    pub fn indent(&self) -> Self {
        Self {
            writer: self.writer.clone(),
            nesting: self.nesting + 1,
        }
    }
}

impl BulletPointPrinter<StdoutLineWriter> {
    pub fn new_stdout() -> Self {
        Self::new(StdoutLineWriter)
    }
}

impl BulletPointPrinter<StderrLineWriter> {
    pub fn new_stderr() -> Self {
        Self::new(StderrLineWriter)
    }
}

pub trait LineWriter {
    fn write_line(&self, line: &str);
}

#[derive(Clone, Copy)]
pub struct StdoutLineWriter;
impl LineWriter for StdoutLineWriter {
    fn write_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// For reports that must not mix with data written to stdout.
#[derive(Clone, Copy)]
pub struct StderrLineWriter;
impl LineWriter for StderrLineWriter {
    fn write_line(&self, line: &str) {
        eprintln!("{}", line);
    }
}
