//! GraphQL documents sent to the LeetCode endpoint

pub const PROGRESS_LIST_OPERATION: &str = "progressList";

pub const PROGRESS_LIST_QUERY: &str = r#"
query progressList($pageNo: Int, $numPerPage: Int, $filters: ProgressListFilterInput) {
  isProgressCalculated
  solvedQuestionsInfo(pageNo: $pageNo, numPerPage: $numPerPage, filters: $filters) {
    currentPage
    pageNum
    totalNum
    data {
      totalSolves
      question {
        questionFrontendId
        questionTitle
        questionDetailUrl
        difficulty
        topicTags {
          name
          slug
        }
      }
      lastAcSession {
        time
        wrongAttempts
      }
    }
  }
}
"#;

pub const NOTE_OPERATION: &str = "QuestionNote";

pub const NOTE_QUERY: &str = r#"
query QuestionNote($titleSlug: String!) {
  question(titleSlug: $titleSlug) {
    questionId
    note
    __typename
  }
}
"#;
