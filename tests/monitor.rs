//! End-to-end tests of the monitor against in-memory collaborators.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use kmonitor::config::monitor::{BANNER, HINT, MAX_ARGS};
use kmonitor::debug::{FunctionSymbol, LineEntry, SymbolTable, WordReader};
use kmonitor::mm::{
    AddressSpace, GenericPTE, MappingFlags, PAGE_STRIDE, PageInfo, PageTableEntry, PhysAddr,
    VirtAddr,
};
use kmonitor::monitor::commands::{BACKTRACE, HELP, KERNINFO, SHOWVA2PA};
use kmonitor::monitor::{CONTINUE, Command, CommandContext, EXIT, KernelLayout, ShellState};
use kmonitor::{Console, KernelView, Monitor, MonitorError, MonitorResult, Registry, TrapFrame};

const WORD: usize = std::mem::size_of::<usize>();
const ADDR_WIDTH: usize = 2 + 2 * WORD;

/// Console fed from a fixed script; `None` entries model failed reads.
#[derive(Default)]
struct Script {
    input: VecDeque<Option<String>>,
    output: String,
    reads: usize,
}

impl Script {
    fn new(lines: &[Option<&str>]) -> Self {
        Self {
            input: lines.iter().map(|l| l.map(String::from)).collect(),
            ..Self::default()
        }
    }

    fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

impl fmt::Write for Script {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl Console for Script {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.reads += 1;
        // Running dry means the test forgot its exit line.
        self.input.pop_front().expect("script exhausted")
    }
}

/// Sparse stack memory.
#[derive(Default)]
struct FakeStack(BTreeMap<usize, usize>);

impl FakeStack {
    fn push_frame(&mut self, fp: usize, saved_fp: usize, ra: usize) {
        self.0.insert(fp, saved_fp);
        self.0.insert(fp + WORD, ra);
        for i in 0..5 {
            self.0.insert(fp + (2 + i) * WORD, 0x100 + i);
        }
    }
}

impl WordReader for FakeStack {
    fn read_word(&self, addr: usize) -> MonitorResult<usize> {
        self.0
            .get(&addr)
            .copied()
            .ok_or_else(|| anyhow::anyhow!(MonitorError::BadFrameRead(addr)))
    }
}

/// Address space with a few mapped pages that records every query.
#[derive(Default)]
struct FakeSpace {
    pages: BTreeMap<usize, (PageInfo, PageTableEntry)>,
    queries: RefCell<Vec<usize>>,
}

impl FakeSpace {
    fn map(&mut self, va: usize, frame: usize, flags: MappingFlags) {
        let entry = PageTableEntry::new_page(PhysAddr::from(frame << 12), flags, false);
        self.pages.insert(va, (PageInfo { frame, ref_count: 1 }, entry));
    }

    fn queries(&self) -> Vec<usize> {
        self.queries.borrow().clone()
    }
}

impl AddressSpace for FakeSpace {
    fn lookup_entry(&self, vaddr: VirtAddr) -> Option<PageTableEntry> {
        self.queries.borrow_mut().push(vaddr.as_usize());
        self.pages.get(&vaddr.as_usize()).map(|(_, e)| *e)
    }

    fn lookup_page(&self, vaddr: VirtAddr) -> Option<(PageInfo, PageTableEntry)> {
        self.pages.get(&vaddr.as_usize()).copied()
    }

    fn page_to_phys(&self, page: &PageInfo) -> PhysAddr {
        PhysAddr::from(page.frame << 12)
    }
}

struct Fixture {
    stack: FakeStack,
    symbols: SymbolTable,
    space: FakeSpace,
    layout: KernelLayout,
}

impl Fixture {
    fn new() -> Self {
        Self {
            stack: FakeStack::default(),
            symbols: SymbolTable::default(),
            space: FakeSpace::default(),
            layout: KernelLayout::default(),
        }
    }

    fn view(&self) -> KernelView<'_> {
        KernelView {
            stack: &self.stack,
            symbols: &self.symbols,
            address_space: &self.space,
            layout: self.layout,
        }
    }

    /// Runs one line with the built-in commands, returning status and output.
    fn run(&self, line: &str, tf: Option<&TrapFrame>) -> (i32, Script) {
        let monitor = Monitor::with_builtin_commands();
        let mut console = Script::default();
        let status = monitor.run_command(line, &mut console, &self.view(), tf);
        (status, console)
    }
}

struct Quit;

impl Command for Quit {
    fn name(&self) -> &'static str {
        "quit"
    }

    fn description(&self) -> &'static str {
        "Leave the monitor"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>) -> MonitorResult<i32> {
        Ok(EXIT)
    }
}

static QUIT: Quit = Quit;

fn registry_with_quit() -> Registry {
    Registry::new(&[&HELP, &KERNINFO, &BACKTRACE, &SHOWVA2PA, &QUIT])
}

#[test]
fn blank_line_runs_nothing() {
    let fx = Fixture::new();
    let (status, console) = fx.run(" \t \r\n", None);
    assert_eq!(status, CONTINUE);
    assert!(console.output.is_empty());
}

#[test]
fn unknown_command_keeps_reading() {
    let fx = Fixture::new();
    let (status, console) = fx.run("frobnicate now", None);
    assert_eq!(status, CONTINUE);
    assert_eq!(console.lines(), ["Unknown command 'frobnicate'"]);

    let monitor = Monitor::with_builtin_commands();
    let mut console = Script::default();
    let next = monitor.step(
        ShellState::Dispatch("frobnicate".into()),
        &mut console,
        &fx.view(),
        None,
    );
    assert_eq!(next, ShellState::ReadLine);
}

#[test]
fn command_names_are_case_sensitive() {
    let fx = Fixture::new();
    let (_, console) = fx.run("HELP", None);
    assert_eq!(console.lines()[0], "Unknown command 'HELP'");
}

#[test]
fn overlong_line_is_rejected_whole() {
    let fx = Fixture::new();
    let line = ["help"; MAX_ARGS].join(" ");
    let (status, console) = fx.run(&line, None);
    assert_eq!(status, CONTINUE);
    assert_eq!(console.lines(), [format!("Too many arguments (max {MAX_ARGS})")]);

    // One token fewer still dispatches.
    let line = ["help"; MAX_ARGS - 1].join(" ");
    let (_, console) = fx.run(&line, None);
    assert_eq!(console.lines().len(), Registry::builtin().len());
}

#[test]
fn help_lists_every_command_once() {
    let fx = Fixture::new();
    let (status, console) = fx.run("help extra args", None);
    assert_eq!(status, CONTINUE);

    let registry = Registry::builtin();
    let lines = console.lines();
    assert_eq!(lines.len(), registry.len());
    for (line, cmd) in lines.iter().zip(registry.list()) {
        assert_eq!(*line, format!("{} - {}", cmd.name(), cmd.description()));
    }
}

#[test]
fn kerninfo_prints_layout_and_footprint() {
    let mut fx = Fixture::new();
    let base = 0xffff_0000_4008_0000usize;
    fx.layout = KernelLayout {
        start: VirtAddr::from(base),
        entry: VirtAddr::from(base),
        etext: VirtAddr::from(base + 0x8000),
        edata: VirtAddr::from(base + 0xa000),
        end: VirtAddr::from(base + 0x10001),
        phys_virt_offset: 0xffff_0000_0000_0000,
    };
    let (_, console) = fx.run("kerninfo", None);
    let lines = console.lines();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "Special kernel symbols:");
    assert_eq!(
        lines[2],
        format!(
            "  entry  {:#0w$x} (virt)  {:#0w$x} (phys)",
            base,
            0x4008_0000,
            w = ADDR_WIDTH
        )
    );
    assert_eq!(lines[6], "Kernel executable memory footprint: 65KB");
}

#[test]
fn showva2pa_without_arguments_prints_usage_only() {
    let fx = Fixture::new();
    let (status, console) = fx.run("showva2pa", None);
    assert_eq!(status, CONTINUE);
    assert_eq!(console.lines(), ["At least one argument."]);
    assert!(fx.space.queries().is_empty());
}

#[test]
fn showva2pa_rejects_extra_and_malformed_arguments() {
    let fx = Fixture::new();
    let (_, console) = fx.run("showva2pa 1000 2000 3000", None);
    assert_eq!(console.lines(), ["Too many arguments (max 2)"]);

    let (_, console) = fx.run("showva2pa 0xzz", None);
    assert_eq!(console.lines(), ["Invalid address '0xzz'"]);
    assert!(fx.space.queries().is_empty());
}

#[test]
fn showva2pa_single_address_queries_once() {
    let mut fx = Fixture::new();
    fx.space.map(0x4000, 0x80, MappingFlags::READ | MappingFlags::WRITE);
    let (_, console) = fx.run("showva2pa 0x4000", None);

    assert_eq!(fx.space.queries(), [0x4000]);
    assert_eq!(
        console.lines(),
        [format!(
            "VA: {:#0w$x}, PA: {:#0w$x}, pp_ref: 1, PTE_W: 1, PTE_U: 0",
            0x4000,
            0x80000,
            w = ADDR_WIDTH
        )]
    );
}

#[test]
fn showva2pa_bounds_are_order_insensitive() {
    let fx = Fixture::new();
    let (_, forward) = fx.run("showva2pa 1000 3000", None);
    let forward_queries = fx.space.queries();
    fx.space.queries.borrow_mut().clear();
    let (_, backward) = fx.run("showva2pa 3000 1000", None);

    assert_eq!(forward.output, backward.output);
    assert_eq!(forward_queries, fx.space.queries());
    assert_eq!(forward_queries, [0x1000, 0x2000, 0x3000]);
}

#[test]
fn showva2pa_reports_each_page_in_order() {
    let mut fx = Fixture::new();
    let a = 0x10_0000;
    fx.space.map(a + PAGE_STRIDE, 0x99, MappingFlags::READ | MappingFlags::USER);
    let (_, console) = fx.run(&format!("showva2pa {a:x} {:x}", a + PAGE_STRIDE), None);

    let lines = console.lines();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        format!("VA: {:#0w$x} does not have a mapped physical page!", a, w = ADDR_WIDTH)
    );
    assert!(lines[1].starts_with(&format!("VA: {:#0w$x}, PA: ", a + PAGE_STRIDE, w = ADDR_WIDTH)));
    assert!(lines[1].ends_with("PTE_W: 0, PTE_U: 1"));
}

#[test]
fn showva2pa_stops_at_top_of_address_space() {
    let fx = Fixture::new();
    let top = usize::MAX & !(PAGE_STRIDE - 1);
    let (_, console) = fx.run(&format!("showva2pa {:x} {:x}", top - PAGE_STRIDE, usize::MAX), None);
    assert_eq!(console.lines().len(), 2);
    assert_eq!(fx.space.queries(), [top - PAGE_STRIDE, top]);
}

#[test]
fn backtrace_walks_from_trap_frame_leaf_first() {
    let mut fx = Fixture::new();
    fx.stack.push_frame(0x8000, 0x8100, 0x1004);
    fx.stack.push_frame(0x8100, 0x8200, 0x2010);
    fx.stack.push_frame(0x8200, 0, 0x3020);
    fx.symbols = SymbolTable::new(
        vec![
            FunctionSymbol { start: 0x1000, size: 0x100, name: "leaf", file: "kern/leaf.rs" },
            FunctionSymbol { start: 0x2000, size: 0x100, name: "middle", file: "kern/mid.rs" },
        ],
        vec![LineEntry { addr: 0x1000, line: 7 }, LineEntry { addr: 0x2000, line: 21 }],
    );

    let tf = TrapFrame::with_frame_pointer(0x8000);
    let (status, console) = fx.run("backtrace", Some(&tf));
    assert_eq!(status, CONTINUE);

    let lines = console.lines();
    assert_eq!(lines[0], "Stack backtrace:");
    let frames: Vec<&str> = lines.iter().copied().filter(|l| l.starts_with("  fp ")).collect();
    assert_eq!(frames.len(), 3);
    for (line, (fp, ra)) in frames.iter().zip([(0x8000, 0x1004), (0x8100, 0x2010), (0x8200, 0x3020)]) {
        assert!(line.starts_with(&format!("  fp {fp:0w$x} ra {ra:0w$x} args", w = 2 * WORD)));
    }
    assert_eq!(lines[2].trim(), "kern/leaf.rs:7: leaf+0x4");
    assert_eq!(lines[4].trim(), "kern/mid.rs:21: middle+0x10");
    assert_eq!(lines[6].trim(), "<unknown>:0: <unknown>+0x0");
    assert_eq!(lines.len(), 7);
}

#[test]
fn backtrace_reports_broken_chain_and_continues() {
    let mut fx = Fixture::new();
    fx.stack.push_frame(0x8000, 0xdead_0000, 0x1004);

    let tf = TrapFrame::with_frame_pointer(0x8000);
    let (status, console) = fx.run("backtrace", Some(&tf));
    assert_eq!(status, CONTINUE);
    let lines = console.lines();
    assert_eq!(lines.last().map(|l| l.trim()), Some("cannot read stack word at 0xdead0000"));
}

#[test]
fn run_ignores_failed_reads_and_stops_on_exit() {
    let fx = Fixture::new();
    let monitor = Monitor::new(registry_with_quit());
    let mut console = Script::new(&[None, Some("help"), None, Some("bogus"), Some("quit")]);

    monitor.run(&mut console, &fx.view(), None);

    assert_eq!(console.reads, 5);
    assert!(console.input.is_empty());
    let lines = console.lines();
    assert_eq!(&lines[..2], [BANNER, HINT]);
    assert_eq!(lines.iter().filter(|l| l.starts_with("quit - ")).count(), 1);
    assert!(lines.contains(&"Unknown command 'bogus'"));
}

#[test]
fn nonnegative_status_keeps_shell_running() {
    let fx = Fixture::new();
    let monitor = Monitor::new(registry_with_quit());
    let mut console = Script::default();
    let view = fx.view();

    let state = monitor.step(ShellState::Dispatch("help".into()), &mut console, &view, None);
    assert_eq!(state, ShellState::ReadLine);
    let state = monitor.step(ShellState::Dispatch("quit".into()), &mut console, &view, None);
    assert_eq!(state, ShellState::Exit);
}

#[test]
fn logger_installs_once() {
    kmonitor::console::init_logger().unwrap();
    let err = kmonitor::console::init_logger().unwrap_err();
    assert_eq!(err.downcast_ref::<MonitorError>(), Some(&MonitorError::LoggerInitFailed));
}
