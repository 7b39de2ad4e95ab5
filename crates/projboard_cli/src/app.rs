//! Interactive session over a mounted board.
//!
//! # Responsibility
//! - Translate parsed commands into sink events (submit, drag sequences).
//! - Print the board after every mutating command.
//!
//! # Invariants
//! - Every store change goes through the mounted components, never the store directly.

use crate::command::{parse, Command, HELP};
use crate::view::render_board;
use log::{debug, warn};
use projboard_core::board::project_input::FORM_ELEMENT_ID;
use projboard_core::{
    BoardConfig, BoardController, DragEvent, DragEventKind, FormValues, InputSource, MemoryForm,
    MemoryRenderSink, ProjectId, ProjectStatus, ProjectStore, RenderError, RenderSink,
};
use std::io::{self, BufRead, Write};
use std::rc::Rc;

const PROMPT: &str = "projboard> ";

pub struct Session {
    sink: Rc<MemoryRenderSink>,
    form: Rc<MemoryForm>,
    board: BoardController,
}

impl Session {
    pub fn mount(config: &BoardConfig) -> Result<Self, RenderError> {
        let sink = Rc::new(MemoryRenderSink::with_board_templates());
        let form = Rc::new(MemoryForm::new());
        let board = BoardController::mount(
            Rc::new(ProjectStore::new()),
            Rc::clone(&sink) as Rc<dyn RenderSink>,
            Rc::clone(&form) as Rc<dyn InputSource>,
            config.form.clone(),
        )?;
        Ok(Self { sink, form, board })
    }

    pub fn board(&self) -> &BoardController {
        &self.board
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> io::Result<()> {
        write!(out, "{PROMPT}")?;
        out.flush()?;
        for line in input.lines() {
            let line = line?;
            let keep_going = match parse(&line) {
                Ok(command) => self.execute(command, out)?,
                Err(message) => {
                    if !message.is_empty() {
                        writeln!(out, "{message}")?;
                    }
                    true
                }
            };
            if !keep_going {
                return Ok(());
            }
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        writeln!(out)
    }

    /// Runs one command; returns `false` when the session should end.
    pub fn execute<W: Write>(&self, command: Command, out: &mut W) -> io::Result<bool> {
        match command {
            Command::Add {
                title,
                description,
                people,
            } => {
                self.form.fill(FormValues::new(title, description, people));
                self.dispatch_submit(out)?;
                write!(out, "{}", render_board(&self.sink))?;
            }
            Command::Drag { id, to } => {
                if let Some(project_id) = self.resolve(&id, out)? {
                    self.drag(project_id, Some(to), out)?;
                    write!(out, "{}", render_board(&self.sink))?;
                }
            }
            Command::Abandon { id } => {
                if let Some(project_id) = self.resolve(&id, out)? {
                    self.drag(project_id, None, out)?;
                    write!(out, "{}", render_board(&self.sink))?;
                }
            }
            Command::Show => write!(out, "{}", render_board(&self.sink))?,
            Command::Json => {
                let projects = self.board.store().snapshot();
                match serde_json::to_string_pretty(&projects) {
                    Ok(json) => writeln!(out, "{json}")?,
                    Err(err) => writeln!(out, "failed to encode projects: {err}")?,
                }
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn dispatch_submit<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if let Err(err) = self.sink.dispatch_submit(FORM_ELEMENT_ID) {
            warn!("event=cli_submit module=cli status=error error={err}");
            writeln!(out, "submit failed: {err}")?;
        }
        for alert in self.form.take_alerts() {
            writeln!(out, "! {alert}")?;
        }
        Ok(())
    }

    fn resolve<W: Write>(&self, needle: &str, out: &mut W) -> io::Result<Option<ProjectId>> {
        let resolved = self.board.resolve_id(needle);
        if resolved.is_none() {
            writeln!(out, "no single project matches `{needle}`")?;
        }
        Ok(resolved)
    }

    /// Start on the card, optionally over and drop on a list, then end on the card.
    fn drag<W: Write>(
        &self,
        project_id: ProjectId,
        target: Option<ProjectStatus>,
        out: &mut W,
    ) -> io::Result<()> {
        let card_id = project_id.to_string();
        let mut event = DragEvent::new();
        if let Err(err) = self
            .sink
            .dispatch_drag(&card_id, DragEventKind::Start, &mut event)
        {
            return writeln!(out, "drag failed: {err}");
        }

        if let Some(kind) = target {
            let list_id = self.board.list(kind).element_id();
            let hovered = self
                .sink
                .dispatch_drag(&list_id, DragEventKind::Over, &mut event)
                .map(|_| event.default_prevented());
            match hovered {
                Ok(true) => {
                    event.reset_default();
                    if let Err(err) =
                        self.sink
                            .dispatch_drag(&list_id, DragEventKind::Drop, &mut event)
                    {
                        writeln!(out, "drop failed: {err}")?;
                    }
                }
                Ok(false) => writeln!(out, "{} list refused the drop", kind.as_str())?,
                Err(err) => writeln!(out, "drag failed: {err}")?,
            }
        }

        // Routed to the card that saw drag-start, even if a move rebuilt it.
        if let Err(err) = self
            .sink
            .dispatch_drag(&card_id, DragEventKind::End, &mut event)
        {
            debug!("event=cli_drag_end module=cli status=skipped error={err}");
        }
        Ok(())
    }
}
