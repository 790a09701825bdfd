//! Line-based presentation of a lesson session.
//!
//! Renders the current task, turns input lines into an `AnswerDraft`, and
//! only forwards a draft to the session loop once it can be submitted.

use std::io::{BufRead, Write};

use lesson_core::model::{AnswerValue, Lesson, LessonResult, Task, TaskKind};
use services::{AnswerDraft, LessonSession, SessionError, SessionLoopService};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlayError {
    #[error("input closed before the lesson was finished")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
}

pub struct Terminal<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Drive `session` to completion and print the result.
    pub async fn play(
        &mut self,
        session_loop: &SessionLoopService,
        session: &mut LessonSession,
    ) -> Result<LessonResult, PlayError> {
        self.render_intro(session.lesson())?;

        loop {
            let progress = session.progress();
            let task = session.current_task()?.clone();
            writeln!(
                self.output,
                "\nTask {} of {} ({}%)",
                progress.position,
                progress.total,
                progress.percent()
            )?;
            let answer = self.collect_answer(&task)?;
            let step = session_loop.answer_current(session, answer).await?;
            if let Some(result) = step.result {
                self.render_result(session.lesson(), &result)?;
                return Ok(result);
            }
        }
    }

    fn render_intro(&mut self, lesson: &Lesson) -> std::io::Result<()> {
        writeln!(self.output, "{}", lesson.title())?;
        if !lesson.topic().is_empty() {
            writeln!(self.output, "Topic: {}", lesson.topic())?;
        }
        if !lesson.grammar_rules().is_empty() {
            writeln!(self.output, "\n{}", lesson.grammar_rules())?;
        }
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, PlayError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PlayError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn collect_answer(&mut self, task: &Task) -> Result<AnswerValue, PlayError> {
        writeln!(self.output, "{}", task.prompt())?;
        match task.kind() {
            TaskKind::FillGap => writeln!(self.output, "Type the missing words:")?,
            TaskKind::MultipleChoice => {
                for (i, option) in task.options().unwrap_or_default().iter().enumerate() {
                    writeln!(self.output, "  {}. {option}", i + 1)?;
                }
                writeln!(self.output, "Enter the option number:")?;
            }
            TaskKind::WordOrder => {
                for (i, word) in task.words().unwrap_or_default().iter().enumerate() {
                    writeln!(self.output, "  {}. {word}", i + 1)?;
                }
                writeln!(
                    self.output,
                    "Enter the word numbers in sentence order, separated by spaces:"
                )?;
            }
        }

        loop {
            let line = self.read_line()?;
            let mut draft = AnswerDraft::for_task(task);
            if let Err(problem) = fill_draft(&mut draft, &line) {
                writeln!(self.output, "{problem}")?;
                continue;
            }
            match draft.into_answer() {
                Some(answer) => return Ok(answer),
                None => writeln!(self.output, "Please complete your answer first.")?,
            }
        }
    }

    fn render_result(&mut self, lesson: &Lesson, result: &LessonResult) -> std::io::Result<()> {
        writeln!(self.output, "\nLesson complete!")?;
        writeln!(
            self.output,
            "Correct: {}  Tasks: {}  Score: {}%",
            result.score(),
            result.max_score(),
            result.percentage()
        )?;

        for (i, item) in result.breakdown().iter().enumerate() {
            let mark = if item.is_correct { "ok" } else { "x" };
            writeln!(self.output, "\n[{mark}] Task {}: {}", i + 1, item.prompt)?;
            writeln!(
                self.output,
                "    Your answer: {}",
                display_answer(lesson.task(i), &item.answer)
            )?;
            if !item.is_correct {
                writeln!(
                    self.output,
                    "    Correct answer: {}",
                    display_answer(lesson.task(i), &item.correct_answer)
                )?;
            }
        }
        Ok(())
    }
}

/// Apply one input line to a fresh draft. `Err` carries a hint for the learner.
fn fill_draft(draft: &mut AnswerDraft, line: &str) -> Result<(), String> {
    match draft.kind() {
        TaskKind::FillGap => draft.set_text(line).map_err(|e| e.to_string()),
        TaskKind::MultipleChoice => {
            let choice: usize = line
                .trim()
                .parse()
                .map_err(|_| "Please enter an option number.".to_owned())?;
            draft.select(choice).map_err(|e| e.to_string())
        }
        TaskKind::WordOrder => {
            let words = draft.word_order_mut().map_err(|e| e.to_string())?;
            for token in line.split_whitespace() {
                let number: usize = token
                    .parse()
                    .map_err(|_| format!("{token:?} is not a word number."))?;
                let index = number
                    .checked_sub(1)
                    .ok_or_else(|| "Word numbers start at 1.".to_owned())?;
                words.place(index).map_err(|e| e.to_string())?;
            }
            Ok(())
        }
    }
}

/// Multiple-choice answers are shown with their option text.
fn display_answer(task: Option<&Task>, answer: &AnswerValue) -> String {
    let option_text = task.and_then(Task::options).and_then(|options| {
        let number: usize = answer.as_text()?.parse().ok()?;
        options.get(number.checked_sub(1)?)
    });
    match option_text {
        Some(text) => format!("{answer}. {text}"),
        None => answer.to_string(),
    }
}
