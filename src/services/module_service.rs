//! Teacher-side module management and the student view of assigned modules.
//!
//! Every operation runs the access gate before touching the store, in the
//! order role, existence, ownership/membership. A rejected call never writes.

use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{require_module_member, require_module_owner, require_student, require_teacher, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Module, Question, Quiz, Role, User},
        dto::{
            request::{
                AcceptTermsRequest, AddQuestionRequest, AssignStudentsRequest, CreateQuizRequest,
                ModuleDetailsRequest, SetTimerRequest, TimerInput,
            },
            response::{
                AssignStudentsResponse, DeleteModuleResponse, ModuleDetail, ModuleSummary,
                QuizSummary, StudentModuleView, StudentQuizSummary, TeacherDashboard, UserDto,
            },
        },
    },
    repositories::{ModuleRepository, QuizRepository, QuizResultRepository, UserRepository},
};

pub struct ModuleService {
    users: Arc<dyn UserRepository>,
    modules: Arc<dyn ModuleRepository>,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn QuizResultRepository>,
    default_time_limit: i32,
}

fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Parses timer input typed into a form. Only positive whole seconds pass.
pub fn parse_time_limit(input: &TimerInput) -> AppResult<i32> {
    let parsed = match input {
        TimerInput::Number(n) => i32::try_from(*n).ok(),
        TimerInput::Text(text) => text.trim().parse::<i32>().ok(),
    };

    match parsed {
        Some(seconds) if seconds > 0 => Ok(seconds),
        _ => Err(AppError::ValidationError(
            "Time limit must be a positive whole number of seconds".to_string(),
        )),
    }
}

impl ModuleService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        modules: Arc<dyn ModuleRepository>,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn QuizResultRepository>,
        default_time_limit: i32,
    ) -> Self {
        Self {
            users,
            modules,
            quizzes,
            results,
            default_time_limit,
        }
    }

    async fn find_module(&self, module_id: &str) -> AppResult<Module> {
        self.modules
            .find_by_id(module_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Module with id '{}' not found", module_id)))
    }

    /// Module the calling teacher owns.
    pub async fn owned_module(&self, claims: &Claims, module_id: &str) -> AppResult<Module> {
        require_teacher(claims)?;
        let module = self.find_module(module_id).await?;
        require_module_owner(claims, &module)?;
        Ok(module)
    }

    /// Module the calling student is assigned to.
    pub async fn member_module(&self, claims: &Claims, module_id: &str) -> AppResult<Module> {
        require_student(claims)?;
        let module = self.find_module(module_id).await?;
        require_module_member(claims, &module)?;
        Ok(module)
    }

    /// Quiz of `module` named by `quiz_id`, or the module's first quiz.
    async fn target_quiz(&self, module: &Module, quiz_id: Option<&str>) -> AppResult<Option<Quiz>> {
        match quiz_id {
            Some(id) => {
                let quiz = self
                    .quizzes
                    .find_by_id(id)
                    .await?
                    .filter(|q| q.module_id == module.id)
                    .ok_or_else(|| {
                        AppError::NotFound(format!("Quiz with id '{}' not found in module", id))
                    })?;
                Ok(Some(quiz))
            }
            None => Ok(self.quizzes.find_by_module(&module.id).await?.into_iter().next()),
        }
    }

    pub async fn create_module(
        &self,
        claims: &Claims,
        request: ModuleDetailsRequest,
    ) -> AppResult<Module> {
        require_teacher(claims)?;
        request.validate()?;

        let title = require_text(&request.title, "Title")?;
        let terms = require_text(&request.terms, "Terms")?;

        let module = self
            .modules
            .create(Module::new(&title, &terms, &claims.sub))
            .await?;

        log::info!("Teacher '{}' created module {}", claims.username, module.id);
        Ok(module)
    }

    pub async fn update_module(
        &self,
        claims: &Claims,
        module_id: &str,
        request: ModuleDetailsRequest,
    ) -> AppResult<Module> {
        self.owned_module(claims, module_id).await?;
        request.validate()?;

        let title = require_text(&request.title, "Title")?;
        let terms = require_text(&request.terms, "Terms")?;

        self.modules.update_details(module_id, &title, &terms).await
    }

    /// Deletes the module and its quizzes. Submitted results are kept.
    pub async fn delete_module(
        &self,
        claims: &Claims,
        module_id: &str,
    ) -> AppResult<DeleteModuleResponse> {
        let module = self.owned_module(claims, module_id).await?;

        let quizzes_deleted = self.quizzes.delete_by_module(&module.id).await?;
        self.modules.delete(&module.id).await?;

        log::info!(
            "Teacher '{}' deleted module {} ({} quizzes)",
            claims.username,
            module.id,
            quizzes_deleted
        );

        Ok(DeleteModuleResponse {
            message: format!("Module '{}' deleted", module.title),
            quizzes_deleted,
        })
    }

    async fn summarize(&self, modules: &[Module]) -> AppResult<Vec<ModuleSummary>> {
        let mut summaries = Vec::with_capacity(modules.len());
        for module in modules {
            let quiz_count = self.quizzes.find_by_module(&module.id).await?.len();
            summaries.push(ModuleSummary::new(module, quiz_count));
        }
        Ok(summaries)
    }

    pub async fn teacher_dashboard(&self, claims: &Claims) -> AppResult<TeacherDashboard> {
        require_teacher(claims)?;

        let modules = self.modules.find_by_teacher(&claims.sub).await?;
        let students = self.users.find_by_role(Role::Student).await?;

        Ok(TeacherDashboard {
            modules: self.summarize(&modules).await?,
            students: students.into_iter().map(UserDto::from).collect(),
        })
    }

    pub async fn module_detail(&self, claims: &Claims, module_id: &str) -> AppResult<ModuleDetail> {
        let module = self.owned_module(claims, module_id).await?;
        let quizzes = self.quizzes.find_by_module(&module.id).await?;

        let by_id: HashMap<String, User> = self
            .users
            .find_by_ids(&module.student_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let students = module
            .student_ids
            .iter()
            .filter_map(|id| by_id.get(id).cloned())
            .map(UserDto::from)
            .collect();

        Ok(ModuleDetail {
            module,
            quizzes,
            students,
        })
    }

    /// Assigns students to a module. Every id is checked before anything is
    /// written; ids already assigned come back as notices.
    pub async fn assign_students(
        &self,
        claims: &Claims,
        module_id: &str,
        request: AssignStudentsRequest,
    ) -> AppResult<AssignStudentsResponse> {
        let module = self.owned_module(claims, module_id).await?;
        request.validate()?;

        let mut requested: Vec<String> = Vec::new();
        for id in request.student_ids {
            let id = id.trim().to_string();
            if !id.is_empty() && !requested.contains(&id) {
                requested.push(id);
            }
        }
        if requested.is_empty() {
            return Err(AppError::ValidationError(
                "At least one student must be selected".to_string(),
            ));
        }

        let found = self.users.find_by_ids(&requested).await?;
        for id in &requested {
            if !found
                .iter()
                .any(|u| &u.id == id && u.is_student() && u.is_registered())
            {
                return Err(AppError::NotFound(format!(
                    "Student with id '{}' not found",
                    id
                )));
            }
        }

        let mut response = AssignStudentsResponse::default();
        for id in requested {
            if module.has_student(&id) {
                let username = found
                    .iter()
                    .find(|u| u.id == id)
                    .map(|u| u.username.as_str())
                    .unwrap_or(id.as_str());
                response
                    .notices
                    .push(format!("{} is already assigned to this module", username));
                response.already_assigned.push(id);
            } else {
                response.assigned.push(id);
            }
        }

        if !response.assigned.is_empty() {
            self.modules
                .add_students(&module.id, &response.assigned)
                .await?;
            log::info!(
                "Assigned {} student(s) to module {}",
                response.assigned.len(),
                module.id
            );
        }

        Ok(response)
    }

    pub async fn add_quiz(
        &self,
        claims: &Claims,
        module_id: &str,
        request: CreateQuizRequest,
    ) -> AppResult<Quiz> {
        let module = self.owned_module(claims, module_id).await?;
        request.validate()?;

        let title = require_text(&request.title, "Title")?;
        let time_limit = request.time_limit.unwrap_or(self.default_time_limit);

        let quiz = self
            .quizzes
            .create(Quiz::new(&module.id, &title, time_limit))
            .await?;

        log::info!("Created quiz {} in module {}", quiz.id, module.id);
        Ok(quiz)
    }

    /// Appends a question. Without a `quiz_id` it goes to the module's first
    /// quiz, which is created on demand.
    pub async fn add_question(
        &self,
        claims: &Claims,
        module_id: &str,
        request: AddQuestionRequest,
    ) -> AppResult<Quiz> {
        let module = self.owned_module(claims, module_id).await?;
        request.validate()?;

        let text = require_text(&request.question_text, "Question text")?;
        let choices = request.choices.into_choices();
        if choices.is_empty() {
            return Err(AppError::ValidationError(
                "At least one choice is required".to_string(),
            ));
        }
        let correct_answer = require_text(&request.correct_answer, "Correct answer")?;

        let question = Question::new(&text, choices, &correct_answer).ok_or_else(|| {
            AppError::ValidationError("Correct answer must be one of the choices".to_string())
        })?;

        let quiz = match self.target_quiz(&module, request.quiz_id.as_deref()).await? {
            Some(quiz) => quiz,
            None => {
                self.quizzes
                    .create(Quiz::new(&module.id, &module.title, self.default_time_limit))
                    .await?
            }
        };

        self.quizzes.add_question(&quiz.id, question).await
    }

    /// Sets a quiz time limit. Invalid input leaves the stored limit alone.
    pub async fn set_timer(
        &self,
        claims: &Claims,
        module_id: &str,
        request: SetTimerRequest,
    ) -> AppResult<Quiz> {
        let module = self.owned_module(claims, module_id).await?;
        let time_limit = parse_time_limit(&request.time_limit)?;

        let quiz = self
            .target_quiz(&module, request.quiz_id.as_deref())
            .await?
            .ok_or_else(|| AppError::NotFound("Module has no quiz".to_string()))?;

        self.quizzes.set_time_limit(&quiz.id, time_limit).await
    }

    pub async fn student_dashboard(&self, claims: &Claims) -> AppResult<Vec<ModuleSummary>> {
        require_student(claims)?;
        let modules = self.modules.find_by_student(&claims.sub).await?;
        self.summarize(&modules).await
    }

    /// Modules visible to the caller: owned ones for a teacher, assigned ones
    /// for a student.
    pub async fn my_modules(&self, claims: &Claims) -> AppResult<Vec<ModuleSummary>> {
        let modules = match claims.role {
            Role::Teacher => self.modules.find_by_teacher(&claims.sub).await?,
            Role::Student => self.modules.find_by_student(&claims.sub).await?,
        };
        self.summarize(&modules).await
    }

    async fn student_view(
        &self,
        claims: &Claims,
        module: Module,
        terms_accepted: bool,
    ) -> AppResult<StudentModuleView> {
        let quizzes = self.quizzes.find_by_module(&module.id).await?;
        let results = self.results.find_by_student(&claims.sub).await?;

        let quizzes = quizzes
            .iter()
            .map(|quiz| {
                let scores: Vec<i32> = results
                    .iter()
                    .filter(|r| r.quiz_id == quiz.id)
                    .map(|r| r.score)
                    .collect();
                StudentQuizSummary {
                    quiz: QuizSummary::from(quiz),
                    attempts: scores.len() as i32,
                    best_score: scores.into_iter().max(),
                }
            })
            .collect();

        Ok(StudentModuleView {
            id: module.id,
            title: module.title,
            terms: module.terms,
            terms_accepted,
            quizzes,
        })
    }

    pub async fn student_module(
        &self,
        claims: &Claims,
        module_id: &str,
    ) -> AppResult<StudentModuleView> {
        let module = self.member_module(claims, module_id).await?;
        self.student_view(claims, module, false).await
    }

    pub async fn accept_terms(
        &self,
        claims: &Claims,
        module_id: &str,
        request: AcceptTermsRequest,
    ) -> AppResult<StudentModuleView> {
        let module = self.member_module(claims, module_id).await?;
        if !request.accept_terms {
            return Err(AppError::ValidationError(
                "You must accept the terms and conditions to continue".to_string(),
            ));
        }
        self.student_view(claims, module, true).await
    }
}
